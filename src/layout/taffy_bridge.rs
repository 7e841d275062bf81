//! Taffy Bridge - Integration with the Taffy layout engine.
//!
//! Converts element styles to Taffy styles, runs layout computation for the
//! document roots and every portal root, and extracts absolute document
//! rects back into a [`ComputedLayout`].

use std::collections::HashMap;

use taffy::{
    AlignItems as TaffyAlignItems, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, JustifyContent as TaffyJustifyContent, LengthPercentage,
    LengthPercentageAuto, NodeId, Overflow as TaffyOverflow, Point as TaffyPoint,
    Position as TaffyPosition, Rect as TaffyRect, Size as TaffySize, Style, TaffyTree,
};

use crate::engine::arrays::{core, text};
use crate::engine::get_allocated_indices;
use crate::error::{Error, Result};
use crate::types::{Dimension, ElementStyle, FlexDirection, Point, Rect, Role, Size};

use super::text_measure::measure_text;
use super::types::ComputedLayout;

// =============================================================================
// STYLE CONVERSION
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Length(n) => TaffyDimension::Length(n),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::Row => TaffyFlexDirection::Row,
    }
}

/// Build a Taffy Style from an element style.
fn build_style(style: &ElementStyle) -> Style {
    let overflow = if style.clip {
        TaffyOverflow::Clip
    } else {
        TaffyOverflow::Visible
    };

    Style {
        display: Display::Flex,
        position: if style.absolute {
            TaffyPosition::Absolute
        } else {
            TaffyPosition::Relative
        },
        flex_direction: to_taffy_flex_direction(style.direction),
        flex_grow: style.grow,
        flex_shrink: style.shrink,
        size: TaffySize {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        margin: TaffyRect {
            top: LengthPercentageAuto::Length(style.margin_block),
            right: LengthPercentageAuto::Length(0.0),
            bottom: LengthPercentageAuto::Length(style.margin_block),
            left: LengthPercentageAuto::Length(0.0),
        },
        padding: TaffyRect {
            top: LengthPercentage::Length(style.padding),
            right: LengthPercentage::Length(style.padding),
            bottom: LengthPercentage::Length(style.padding),
            left: LengthPercentage::Length(style.padding),
        },
        gap: TaffySize {
            width: LengthPercentage::Length(style.gap),
            height: LengthPercentage::Length(style.gap),
        },
        align_items: style.centered.then_some(TaffyAlignItems::Center),
        justify_content: style.centered.then_some(TaffyJustifyContent::Center),
        overflow: TaffyPoint {
            x: overflow,
            y: overflow,
        },
        ..Default::default()
    }
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_leaf(
    idx: usize,
    known_dimensions: TaffySize<Option<f32>>,
    available_space: TaffySize<AvailableSpace>,
) -> TaffySize<f32> {
    if let TaffySize { width: Some(width), height: Some(height) } = known_dimensions {
        return TaffySize { width, height };
    }

    let content = text::get_text_content(idx);
    let avail_width = match (known_dimensions.width, available_space.width) {
        (Some(w), _) => Some(w.max(0.0) as usize),
        (None, AvailableSpace::Definite(w)) => Some(w.max(0.0) as usize),
        (None, AvailableSpace::MinContent) => Some(0),
        (None, AvailableSpace::MaxContent) => None,
    };

    let Size { width, height } = measure_text(
        &content,
        text::get_writing_mode(idx),
        text::get_text_wrap(idx),
        avail_width,
    );

    TaffySize {
        width: known_dimensions.width.unwrap_or(width),
        height: known_dimensions.height.unwrap_or(height),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute layout for every allocated element.
///
/// Document roots (parentless elements that are not portal roots) are laid
/// out at `viewport_width` and stacked top to bottom. Each portal root is laid
/// out independently and placed at its document position.
pub fn compute_layout_taffy(
    viewport_width: f32,
    portal_roots: &[(usize, Point)],
) -> Result<ComputedLayout> {
    let indices = get_allocated_indices();
    let mut result = ComputedLayout::new();

    if indices.is_empty() {
        return Ok(result);
    }

    let mut tree: TaffyTree<usize> = TaffyTree::new();
    let mut index_to_node: HashMap<usize, NodeId> = HashMap::new();

    // First pass: create every node
    for &idx in &indices {
        let element_style = core::get_style(idx);
        let mut style = build_style(&element_style);

        let is_root = core::get_parent_index(idx).is_none();
        if is_root && element_style.width == Dimension::Auto {
            let is_portal = portal_roots.iter().any(|&(root, _)| root == idx);
            if !is_portal {
                style.size.width = TaffyDimension::Length(viewport_width);
            }
        }

        let is_text = core::get_role(idx).contains(Role::TEXT);
        let node = if is_text {
            tree.new_leaf_with_context(style, idx)
        } else {
            tree.new_leaf(style)
        }
        .map_err(|e| Error::Layout(format!("{:?}", e)))?;

        index_to_node.insert(idx, node);
    }

    // Second pass: ordered parent-child links
    let mut document_roots = Vec::new();
    for &idx in &indices {
        match core::get_parent_index(idx) {
            Some(_) => {}
            None => {
                if !portal_roots.iter().any(|&(root, _)| root == idx) {
                    document_roots.push(idx);
                }
            }
        }

        let Some(&parent_node) = index_to_node.get(&idx) else { continue };
        for child in core::get_children(idx) {
            if let Some(&child_node) = index_to_node.get(&child) {
                tree.add_child(parent_node, child_node)
                    .map_err(|e| Error::Layout(format!("{:?}", e)))?;
            }
        }
    }

    let available = TaffySize {
        width: AvailableSpace::Definite(viewport_width),
        height: AvailableSpace::MaxContent,
    };

    let mut measure_fn = |known_dimensions: TaffySize<Option<f32>>,
                          available_space: TaffySize<AvailableSpace>,
                          _node_id: NodeId,
                          context: Option<&mut usize>,
                          _style: &Style| {
        match context {
            Some(&mut idx) => measure_leaf(idx, known_dimensions, available_space),
            None => TaffySize::ZERO,
        }
    };

    // Document flow
    let mut flow_y = 0.0f32;
    let mut flow_width = 0.0f32;
    for &root in &document_roots {
        let node = index_to_node[&root];
        tree.compute_layout_with_measure(node, available, &mut measure_fn)
            .map_err(|e| Error::Layout(format!("{:?}", e)))?;

        let height = extract(&tree, &index_to_node, root, Point::new(0.0, flow_y), &mut result)?;
        flow_y += height;
        if let Some(rect) = result.rect(root) {
            flow_width = flow_width.max(rect.width);
        }
    }
    result.document_size = Size::new(flow_width, flow_y);

    // Portal layers
    for &(root, position) in portal_roots {
        let Some(&node) = index_to_node.get(&root) else { continue };
        tree.compute_layout_with_measure(node, available, &mut measure_fn)
            .map_err(|e| Error::Layout(format!("{:?}", e)))?;
        extract(&tree, &index_to_node, root, position, &mut result)?;
    }

    Ok(result)
}

/// Walk a laid-out subtree, recording absolute rects. Returns the root height.
fn extract(
    tree: &TaffyTree<usize>,
    index_to_node: &HashMap<usize, NodeId>,
    root: usize,
    origin: Point,
    result: &mut ComputedLayout,
) -> Result<f32> {
    let mut stack = vec![(root, origin, true)];
    let mut root_height = 0.0;

    while let Some((idx, parent_origin, is_root)) = stack.pop() {
        let Some(&node) = index_to_node.get(&idx) else { continue };
        let layout = tree
            .layout(node)
            .map_err(|e| Error::Layout(format!("{:?}", e)))?;

        // Roots are placed by the caller, not by their own margin box
        let (x, y) = if is_root {
            (parent_origin.x, parent_origin.y)
        } else {
            (parent_origin.x + layout.location.x, parent_origin.y + layout.location.y)
        };
        let rect = Rect::new(x, y, layout.size.width, layout.size.height);
        result.rects.insert(idx, rect);
        if is_root {
            root_height = layout.size.height;
        }

        for child in core::get_children(idx) {
            stack.push((child, Point::new(x, y), false));
        }
    }

    Ok(root_height)
}
