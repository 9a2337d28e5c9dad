//! Shape generation for 2D primitives
//!
//! Everything becomes a triangle list in canvas space. Images and text are
//! left to the host, which composites them over the GPU frame.

use glam::Vec2;
use std::f32::consts::PI;

use super::scene::{DrawCmd, DrawList};
use super::vertex::Vertex;
use crate::sim::collision::Aabb;

/// Fraction of each dash period that is drawn
const DASH_FILL: f32 = 0.5;

/// Tessellate a whole draw list
pub fn tessellate(list: &DrawList, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::new();

    for cmd in list.iter() {
        match cmd {
            DrawCmd::FillRect { rect, color } => {
                vertices.extend(rect_fill(rect, color.to_array()));
            }
            DrawCmd::StrokeRect { rect, color, width } => {
                vertices.extend(rect_outline(rect, *width, color.to_array()));
            }
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => {
                vertices.extend(circle(*center, *radius, color.to_array(), segments));
            }
            DrawCmd::StrokeCircle {
                center,
                radius,
                color,
                width,
                dashed,
            } => {
                let inner = (radius - width / 2.0).max(0.0);
                let outer = radius + width / 2.0;
                if *dashed {
                    // Dashes need more slices to read as dashes
                    vertices.extend(dashed_ring(*center, inner, outer, color.to_array(), segments * 2));
                } else {
                    vertices.extend(ring(*center, inner, outer, color.to_array(), segments));
                }
            }
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => {
                vertices.extend(line(*from, *to, *width, color.to_array()));
            }
            DrawCmd::Image { .. } | DrawCmd::Text { .. } => {}
        }
    }

    vertices
}

/// Two triangles spanning four corners
fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled rectangle
pub fn rect_fill(rect: &Aabb, color: [f32; 4]) -> [Vertex; 6] {
    let min = rect.min;
    let max = rect.max();
    quad(
        min,
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        max,
        color,
    )
}

/// Generate vertices for a rectangle outline, stroke centered on the edge
pub fn rect_outline(rect: &Aabb, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = width / 2.0;
    let min = rect.min - Vec2::splat(half);
    let outer = rect.size + Vec2::splat(width);

    let edges = [
        Aabb::new(min, Vec2::new(outer.x, width)),
        Aabb::new(Vec2::new(min.x, min.y + outer.y - width), Vec2::new(outer.x, width)),
        Aabb::new(min, Vec2::new(width, outer.y)),
        Aabb::new(Vec2::new(min.x + outer.x - width, min.y), Vec2::new(width, outer.y)),
    ];
    edges.iter().flat_map(|edge| rect_fill(edge, color)).collect()
}

/// Generate vertices for a thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, from - perp, to + perp, to - perp, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// One slice of an annulus between two angles
fn ring_slice(center: Vec2, inner_radius: f32, outer_radius: f32, theta1: f32, theta2: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir1 = Vec2::from_angle(theta1);
    let dir2 = Vec2::from_angle(theta2);
    quad(
        center + dir1 * inner_radius,
        center + dir1 * outer_radius,
        center + dir2 * inner_radius,
        center + dir2 * outer_radius,
        color,
    )
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let step = 2.0 * PI / segments as f32;
    (0..segments)
        .flat_map(|i| {
            let theta = i as f32 * step;
            ring_slice(center, inner_radius, outer_radius, theta, theta + step, color)
        })
        .collect()
}

/// Generate vertices for a dashed ring; every slice is one dash period
pub fn dashed_ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let step = 2.0 * PI / segments as f32;
    (0..segments)
        .flat_map(|i| {
            let theta = i as f32 * step;
            ring_slice(center, inner_radius, outer_radius, theta, theta + step * DASH_FILL, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Color;
    use crate::renderer::scene::{ImageRef, TextAlign};

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect_fill(&Aabb::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0)), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_vertices_on_radius() {
        let verts = circle(Vec2::new(5.0, 5.0), 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for (i, v) in verts.iter().enumerate() {
            let d = Vec2::from(v.position).distance(Vec2::new(5.0, 5.0));
            if i % 3 == 0 {
                assert!(d < 1e-4);
            } else {
                assert!((d - 10.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_dashed_ring_same_count_shorter_arcs() {
        let solid = ring(Vec2::ZERO, 8.0, 10.0, [1.0; 4], 12);
        let dashed = dashed_ring(Vec2::ZERO, 8.0, 10.0, [1.0; 4], 12);
        assert_eq!(solid.len(), dashed.len());
        // Each dash stops short of the next slice
        assert_ne!(solid[5].position, dashed[5].position);
    }

    #[test]
    fn test_line_has_requested_width() {
        let verts = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_tessellate_skips_images_and_text() {
        let mut list = DrawList::default();
        list.push(DrawCmd::FillRect {
            rect: Aabb::new(Vec2::ZERO, Vec2::ONE),
            color: Color::WHITE,
        });
        list.push(DrawCmd::Image {
            image: ImageRef::Background,
            rect: Aabb::new(Vec2::ZERO, Vec2::ONE),
            flip_x: false,
        });
        list.push(DrawCmd::Text {
            pos: Vec2::ZERO,
            text: "hi".to_string(),
            size: 12.0,
            color: Color::WHITE,
            align: TextAlign::Left,
        });
        list.push(DrawCmd::StrokeRect {
            rect: Aabb::new(Vec2::ZERO, Vec2::ONE),
            color: Color::BLACK,
            width: 1.0,
        });

        let verts = tessellate(&list, 24);
        assert_eq!(verts.len(), 6 + 24);
        assert_eq!(verts[0].color, Color::WHITE.to_array());
    }
}
