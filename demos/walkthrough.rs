//! Walkthrough - Both components on a headless page
//!
//! Builds a small article page, then drives it the way a user would:
//! resizing the viewport, clicking the disclosure trigger, scrolling and
//! clicking elsewhere.
//!
//! Run with: RUST_LOG=debug cargo run --example walkthrough

use spark_aside::{
    bounds, create_element, Dimension, disclosure, label_strip, reset_host, DisclosureContent,
    DisclosureProps, ElementSpec, ElementStyle, LabelStripProps, PointerEvent, Role,
    state::{pointer, viewport},
};

fn click(index: usize) {
    pointer::dispatch(PointerEvent::down(0.0, 0.0).on(index));
    pointer::dispatch(PointerEvent::up(0.0, 0.0).on(index));
}

fn main() {
    env_logger::init();
    reset_host();

    println!("=== spark-aside Walkthrough ===\n");

    viewport::dispatch_resize(600.0, 40.0);

    let main_el = create_element(None, ElementSpec::new(Role::MAIN));
    let strip = label_strip(LabelStripProps {
        parent: Some(main_el),
        label: "X".repeat(80),
        gap: Some(48.0),
        ..Default::default()
    });

    let article = create_element(
        Some(main_el),
        ElementSpec::new(Role::ARTICLE).with_style(ElementStyle {
            width: Dimension::Length(100.0),
            ..Default::default()
        }),
    );
    let paragraph = create_element(Some(article), ElementSpec::new(Role::PARAGRAPH));
    create_element(Some(paragraph), ElementSpec::text("The new proposal flow"));
    let note = disclosure(DisclosureProps {
        parent: Some(paragraph),
        trigger: "[1]".into(),
        content: DisclosureContent::new("We closed in a week.").with_attribution("A Customer"),
        config: None,
    });

    println!("viewport 600: strip copies = {}", strip.repeat_count());
    println!("              can float    = {}", note.can_float());

    click(note.trigger());
    println!("\nclicked trigger: {:?}", note.state());
    if let Some(content) = note.content_element() {
        println!("  panel bounds:  {:?}", bounds(content));
    }

    viewport::dispatch_scroll_to(0.0, 1.0);
    println!("scrolled:        {:?}", note.mode());

    viewport::dispatch_resize(300.0, 40.0);
    println!("\nviewport 300: strip copies = {}", strip.repeat_count());
    println!("              can float    = {}", note.can_float());

    click(note.trigger());
    println!("\nclicked trigger: {:?}", note.mode());
    viewport::dispatch_scroll_to(0.0, 0.0);
    println!("scrolled:        {:?}", note.mode());

    pointer::dispatch(PointerEvent::down(0.0, 0.0).on(main_el));
    println!("clicked outside: {:?}", note.mode());

    note.unmount();
    strip.unmount();
    println!("\nunmounted; resize listeners left: {}", viewport::resize_listener_count());
}
