//! Paginator control row (first, previous, page indicator, next, last).

use twilight_model::channel::message::{
    EmojiReactionType,
    component::{ActionRow, Button, ButtonStyle, Component},
};

use super::cursor::{NavControl, PageCursor};
use super::token::build_custom_id;

/// Build the control row for a paginated message.
///
/// The page indicator is always disabled; the four navigation buttons are disabled
/// when `navigation_disabled` is set or there is only one page.
pub fn build_nav_components(
    session_id: u64,
    cursor: &PageCursor,
    style: ButtonStyle,
    navigation_disabled: bool,
) -> Vec<Component> {
    let locked = navigation_disabled || cursor.total() <= 1;

    let buttons = NavControl::ALL
        .into_iter()
        .map(|control| {
            let button = match control {
                NavControl::Indicator => Button {
                    id: None,
                    custom_id: Some(build_custom_id(session_id, control)),
                    disabled: true,
                    emoji: None,
                    label: Some(cursor.label()),
                    style: ButtonStyle::Secondary,
                    url: None,
                    sku_id: None,
                },
                _ => Button {
                    id: None,
                    custom_id: Some(build_custom_id(session_id, control)),
                    disabled: locked,
                    emoji: Some(control_emoji(control)),
                    label: None,
                    style,
                    url: None,
                    sku_id: None,
                },
            };
            Component::Button(button)
        })
        .collect();

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}

fn control_emoji(control: NavControl) -> EmojiReactionType {
    let name = match control {
        NavControl::First => "⏪",
        NavControl::Previous => "◀️",
        NavControl::Next => "▶️",
        NavControl::Last => "⏩",
        NavControl::Indicator => "📄",
    };

    EmojiReactionType::Unicode {
        name: name.to_owned(),
    }
}

#[cfg(test)]
pub(crate) fn buttons(components: &[Component]) -> Vec<Button> {
    components
        .iter()
        .flat_map(|component| match component {
            Component::ActionRow(row) => row.components.clone(),
            other => vec![other.clone()],
        })
        .filter_map(|component| match component {
            Component::Button(button) => Some(button),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_five_buttons_with_indicator_in_the_middle() {
        let cursor = PageCursor::new(20, 3);
        let rendered = buttons(&build_nav_components(9, &cursor, ButtonStyle::Primary, false));

        assert_eq!(rendered.len(), 5);
        assert_eq!(rendered[2].label.as_deref(), Some("3/20"));
        assert!(rendered[2].disabled);
        assert_eq!(rendered[2].style, ButtonStyle::Secondary);

        for index in [0, 1, 3, 4] {
            assert!(!rendered[index].disabled);
            assert_eq!(rendered[index].style, ButtonStyle::Primary);
        }

        let ids: Vec<_> = rendered
            .iter()
            .map(|button| button.custom_id.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            ids,
            ["pg:9:first", "pg:9:prev", "pg:9:page", "pg:9:next", "pg:9:last"]
        );
    }

    #[test]
    fn single_page_disables_navigation() {
        let cursor = PageCursor::new(1, 1);
        let rendered = buttons(&build_nav_components(1, &cursor, ButtonStyle::Secondary, false));

        assert!(rendered.iter().all(|button| button.disabled));
        assert_eq!(rendered[2].label.as_deref(), Some("1/1"));
    }

    #[test]
    fn locked_row_disables_every_button() {
        let cursor = PageCursor::new(6, 2);
        let rendered = buttons(&build_nav_components(1, &cursor, ButtonStyle::Secondary, true));

        assert!(rendered.iter().all(|button| button.disabled));
    }
}
