//! Property tests for the counting and placement rules, both as pure
//! functions and through the host's event path.

use proptest::prelude::*;

use spark_aside::{
    can_float, create_element, disclosure, floating_position, label_strip, reset_host,
    tile_count, Dimension, DisclosureContent, DisclosureMode, DisclosureProps, ElementSpec,
    ElementStyle, LabelStripProps, Point, Rect, Role,
    state::{pointer, viewport},
};

fn expected_copies(container: u32, label: u32, gap: u32) -> usize {
    ((container + gap) / (label + gap)).max(1) as usize
}

proptest! {
    #[test]
    fn tile_count_matches_formula(container in 0u32..2000, label in 1u32..200, gap in 0u32..100) {
        let count = tile_count(container as f32, label as f32, gap as f32);
        prop_assert_eq!(count, Some(expected_copies(container, label, gap)));
    }

    #[test]
    fn tile_count_never_below_one(container in -50.0f32..2000.0, label in 0.1f32..500.0, gap in 0.0f32..100.0) {
        let count = tile_count(container, label, gap);
        prop_assert!(count.is_some_and(|n| n >= 1));
    }

    #[test]
    fn unmeasurable_label_has_no_count(container in 0.0f32..2000.0, label in -10.0f32..=0.0, gap in 0.0f32..100.0) {
        prop_assert_eq!(tile_count(container, label, gap), None);
    }

    #[test]
    fn can_float_is_threshold(space in -100.0f32..2000.0, min in 0.0f32..1000.0) {
        prop_assert_eq!(can_float(space, min), space >= min);
    }

    #[test]
    fn floating_position_clears_container(
        x in 0.0f32..500.0,
        y in 0.0f32..500.0,
        width in 1.0f32..500.0,
        para_offset in 0.0f32..100.0,
        scroll_y in 0.0f32..300.0,
        gap in 0.0f32..64.0,
    ) {
        let container = Rect::new(x, y, width, 200.0);
        let paragraph = Rect::new(x, y + para_offset, width, 3.0);
        let scroll = Point::new(0.0, scroll_y);

        let pos = floating_position(Some(paragraph), container, scroll, gap);
        prop_assert_eq!(pos.x, container.right() + gap);
        prop_assert_eq!(pos.y, paragraph.top() + scroll_y);

        let fallback = floating_position(None, container, scroll, gap);
        prop_assert_eq!(fallback.y, container.top() + scroll_y);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn strip_count_holds_after_any_resize(
        label in 1u32..40,
        gap in 0u32..20,
        first in 1u32..400,
        second in 1u32..400,
    ) {
        reset_host();
        viewport::dispatch_resize(first as f32, 20.0);
        let main = create_element(None, ElementSpec::new(Role::MAIN));
        let strip = label_strip(LabelStripProps {
            parent: Some(main),
            label: "#".repeat(label as usize),
            gap: Some(gap as f32),
            ..Default::default()
        });
        prop_assert_eq!(strip.repeat_count(), expected_copies(first, label, gap));

        viewport::dispatch_resize(second as f32, 20.0);
        prop_assert_eq!(strip.repeat_count(), expected_copies(second, label, gap));
        prop_assert_eq!(strip.instances().len(), strip.repeat_count());

        // An empty label keeps the last count
        strip.set_label("");
        viewport::dispatch_resize(first as f32, 20.0);
        prop_assert_eq!(strip.repeat_count(), expected_copies(second, label, gap));
    }

    #[test]
    fn open_mode_follows_room_beside_article(first in 100u32..1000, second in 100u32..1000) {
        reset_host();
        viewport::dispatch_resize(first as f32, 30.0);
        let main = create_element(None, ElementSpec::new(Role::MAIN));
        let article = create_element(
            Some(main),
            ElementSpec::new(Role::ARTICLE).with_style(ElementStyle {
                width: Dimension::Length(100.0),
                ..Default::default()
            }),
        );
        let paragraph = create_element(Some(article), ElementSpec::new(Role::PARAGRAPH));
        let note = disclosure(DisclosureProps {
            parent: Some(paragraph),
            trigger: "*".into(),
            content: DisclosureContent::new("q"),
            config: None,
        });
        prop_assert_eq!(note.can_float(), first >= 520);

        pointer::activate(note.trigger());
        viewport::dispatch_resize(second as f32, 30.0);
        let expected = if second >= 520 {
            DisclosureMode::OpenFloating
        } else {
            DisclosureMode::OpenInline
        };
        prop_assert_eq!(note.mode(), expected);
        prop_assert_eq!(note.position().is_some(), second >= 520);
    }
}
