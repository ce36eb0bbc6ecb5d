use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::graph::{MapNode, NodeKind};

/// Projects a world position: pan is applied in untransformed space, then
/// the composed result is scaled, so zoom stays anchored at the canvas
/// centre.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + (world + pan) * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center()) / zoom - pan
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan * zoom;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn node_fill(node: &MapNode) -> Color32 {
    match node.kind {
        NodeKind::Root => Color32::from_rgb(245, 206, 93),
        NodeKind::Document => Color32::from_rgb(96, 150, 215),
        NodeKind::Section => theme_color(node.color_theme.as_deref()),
    }
}

/// Section colors come from the analysis pipeline as loose theme names.
pub(super) fn theme_color(theme: Option<&str>) -> Color32 {
    match theme.map(str::to_ascii_lowercase).as_deref() {
        Some("blue") => Color32::from_rgb(100, 181, 246),
        Some("green") => Color32::from_rgb(129, 199, 132),
        Some("purple") => Color32::from_rgb(179, 136, 255),
        Some("orange") => Color32::from_rgb(255, 167, 89),
        Some("red") => Color32::from_rgb(229, 115, 115),
        Some("teal") => Color32::from_rgb(77, 208, 225),
        Some("pink") => Color32::from_rgb(240, 128, 171),
        _ => Color32::from_rgb(144, 164, 174),
    }
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Pos2, Rect, vec2};

    use super::{screen_to_world, theme_color, world_to_screen};

    fn canvas() -> Rect {
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(800.0, 600.0))
    }

    #[test]
    fn origin_projects_to_canvas_centre_at_identity() {
        let screen = world_to_screen(canvas(), vec2(0.0, 0.0), 1.0, vec2(0.0, 0.0));
        assert_eq!(screen, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn pan_is_applied_before_zoom() {
        let screen = world_to_screen(canvas(), vec2(10.0, 0.0), 2.0, vec2(5.0, 0.0));
        // (5 + 10) * 2 past the centre.
        assert_eq!(screen, Pos2::new(430.0, 300.0));
    }

    #[test]
    fn projection_round_trips() {
        let pan = vec2(33.0, -71.0);
        let zoom = 1.7;
        let world = vec2(-140.0, 95.0);

        let screen = world_to_screen(canvas(), pan, zoom, world);
        let back = screen_to_world(canvas(), pan, zoom, screen);
        assert!((back - world).length() < 0.001);
    }

    #[test]
    fn zoom_is_anchored_at_the_canvas_centre() {
        let centre_world = screen_to_world(canvas(), vec2(0.0, 0.0), 1.0, Pos2::new(400.0, 300.0));
        for zoom in [0.1, 0.5, 2.0, 3.0] {
            let projected = world_to_screen(canvas(), vec2(0.0, 0.0), zoom, centre_world);
            assert_eq!(projected, Pos2::new(400.0, 300.0), "zoom {zoom}");
        }
    }

    #[test]
    fn unknown_themes_fall_back_to_the_neutral_color() {
        assert_eq!(theme_color(Some("chartreuse")), theme_color(None));
        assert_ne!(theme_color(Some("blue")), theme_color(None));
        assert_eq!(theme_color(Some("Blue")), theme_color(Some("blue")));
    }
}
