// SPDX-License-Identifier: MPL-2.0
//! Toast widget for the notification currently surfaced by the sequencer.
//!
//! The toast is a card at the top of the screen with a type-colored stripe,
//! the notification's title and message, and a close button. Tapping the card
//! opens the notifications screen; the close button only hides it.
//!
//! The auto-dismiss timer fires off the UI thread, so hosts must include
//! [`subscription`] to get a redraw once the toast has expired.

use crate::notifications::{FireAndForget, Notification, NotificationCenter, ToastSequencer};
use crate::ui::design_tokens::{
    border, opacity, palette, radius, shadow, sizing, spacing, typography,
};
use crate::ui::theming::ColorScheme;
use iced::widget::{button, container, mouse_area, text, Column, Container, Row, Text};
use iced::{alignment, font, mouse, time, Color, Element, Font, Length, Subscription, Theme};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Messages emitted by the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The card was tapped.
    Open,
    /// The close button was pressed.
    Dismiss,
    /// Periodic tick from [`subscription`].
    Tick,
}

/// Routes a toast message to the center.
///
/// Returns the mark-as-read request to run when the toast was opened.
pub fn update(center: &mut NotificationCenter, message: Message) -> Option<FireAndForget> {
    match message {
        Message::Open => center.tap_toast().and_then(|tapped| tapped.request),
        Message::Dismiss => {
            center.dismiss_toast();
            None
        }
        Message::Tick => {
            center.process_pending();
            None
        }
    }
}

/// Ticks while a toast is visible or pushed changes may arrive.
///
/// Each tick drains buffered changes, and the redraw that follows picks up
/// an auto-dismiss that happened on the timer's thread.
pub fn subscription(center: &NotificationCenter) -> Subscription<Message> {
    if center.is_connected() || center.sequencer().is_visible() {
        time::every(TICK_INTERVAL).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

/// Renders a single toast card.
pub fn view<'a>(notification: &Notification, colors: &ColorScheme) -> Element<'a, Message> {
    let accent = colors.accent_for(notification.kind());
    let surface = colors.surface_primary;
    let outline = colors.surface_secondary;
    let text_secondary = colors.text_secondary;

    let stripe = Container::new(text(""))
        .width(Length::Fixed(sizing::TOAST_ACCENT_WIDTH))
        .height(Length::Fill)
        .style(move |_: &Theme| accent_stripe_style(accent));

    let title = Text::new(notification.title().to_owned())
        .size(typography::TITLE_SM)
        .font(Font {
            weight: font::Weight::Bold,
            ..Font::DEFAULT
        })
        .color(colors.text_primary);

    let message = Text::new(notification.message().to_owned())
        .size(typography::BODY)
        .color(colors.text_secondary);

    let dismiss_button = button(Text::new("\u{2715}").size(sizing::ICON_SM))
        .on_press(Message::Dismiss)
        .padding(spacing::XXS)
        .style(move |_: &Theme, status| dismiss_button_style(text_secondary, status));

    // Layout: [stripe] [title / message] [dismiss]
    let content = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(stripe)
        .push(
            Column::new()
                .spacing(spacing::XXS)
                .width(Length::Fill)
                .push(title)
                .push(message),
        )
        .push(dismiss_button);

    let card = Container::new(content)
        .width(Length::Fixed(sizing::TOAST_WIDTH))
        .padding(spacing::SM)
        .style(move |_: &Theme| toast_container_style(surface, outline));

    mouse_area(card)
        .on_press(Message::Open)
        .interaction(mouse::Interaction::Pointer)
        .into()
}

/// Renders the toast overlay, centered at the top of the screen.
///
/// Produces an empty element while the sequencer is idle.
pub fn view_overlay<'a>(
    sequencer: &ToastSequencer,
    colors: &ColorScheme,
) -> Element<'a, Message> {
    match sequencer.current() {
        Some(notification) => Container::new(view(&notification, colors))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Top)
            .padding(spacing::MD)
            .into(),
        // Return an empty container that takes no space
        None => Container::new(text(""))
            .width(Length::Shrink)
            .height(Length::Shrink)
            .into(),
    }
}

/// Style function for the toast card.
fn toast_container_style(surface: Color, outline: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(Color {
            a: opacity::SURFACE,
            ..surface
        })),
        border: iced::Border {
            color: outline,
            width: border::WIDTH_SM,
            radius: radius::MD.into(),
        },
        shadow: shadow::MD,
        ..Default::default()
    }
}

fn accent_stripe_style(accent: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(accent)),
        border: iced::Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Style function for the dismiss button.
fn dismiss_button_style(text_color: Color, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Active | button::Status::Disabled => None,
        button::Status::Hovered => Some(opacity::OVERLAY_SUBTLE),
        button::Status::Pressed => Some(opacity::OVERLAY_MEDIUM),
    };

    button::Style {
        background: background.map(|a| {
            iced::Background::Color(Color {
                a,
                ..palette::GRAY_400
            })
        }),
        text_color,
        border: iced::Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}
