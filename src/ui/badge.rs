// SPDX-License-Identifier: MPL-2.0
//! Unread badge pill for the notifications tab.

use crate::notifications::Badge;
use crate::ui::design_tokens::{radius, sizing, spacing, typography};
use crate::ui::theming::ColorScheme;
use iced::widget::{container, text, Container, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// Renders the badge, or an empty element when nothing is unread.
pub fn view<'a, Message: 'a>(badge: Badge, colors: &ColorScheme) -> Element<'a, Message> {
    let Some(label) = badge.label() else {
        return Container::new(text(""))
            .width(Length::Shrink)
            .height(Length::Shrink)
            .into();
    };

    let background = colors.badge_background;
    let width = pill_width(&label);
    Container::new(
        Text::new(label)
            .size(typography::CAPTION)
            .color(colors.badge_text),
    )
    .width(width)
    .height(Length::Fixed(sizing::BADGE_HEIGHT))
    .padding([0.0, spacing::XXS])
    .align_x(alignment::Horizontal::Center)
    .align_y(alignment::Vertical::Center)
    .style(move |_: &Theme| badge_style(background))
    .into()
}

/// Single digits get a round pill; longer labels grow with their text.
fn pill_width(label: &str) -> Length {
    if label.chars().count() <= 1 {
        Length::Fixed(sizing::BADGE_HEIGHT)
    } else {
        Length::Shrink
    }
}

fn badge_style(background: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(background)),
        border: iced::Border {
            radius: radius::FULL.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
