use eframe::egui::{self, Align2, Color32, FontId, Mesh, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};

use crate::analysis::kpi::tooltip_lines;
use crate::color::highlight;
use crate::data::boundaries::{Bounds, Point, StateBoundaries, StateShape};
use crate::state::DashboardState;

/// Share of the map rect the boundaries may occupy.
const FIT_MARGIN: f32 = 0.95;

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Equirectangular projection fitted to a screen rect, with longitudes
/// shortened by the cosine of the centre latitude.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    center_lon: f64,
    center_lat: f64,
    lon_factor: f64,
    /// Pixels per degree of latitude.
    scale: f64,
    origin: Pos2,
}

impl Projection {
    /// `None` for an empty or zero-area extent.
    pub fn fit(bounds: Bounds, rect: Rect) -> Option<Self> {
        let center_lon = (bounds.min_lon + bounds.max_lon) / 2.0;
        let center_lat = (bounds.min_lat + bounds.max_lat) / 2.0;
        let lon_factor = center_lat.to_radians().cos();
        let width = (bounds.max_lon - bounds.min_lon) * lon_factor;
        let height = bounds.max_lat - bounds.min_lat;
        if width <= 0.0 || height <= 0.0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let scale = f64::min(rect.width() as f64 / width, rect.height() as f64 / height)
            * FIT_MARGIN as f64;
        Some(Self {
            center_lon,
            center_lat,
            lon_factor,
            scale,
            origin: rect.center(),
        })
    }

    pub fn project(&self, [lon, lat]: Point) -> Pos2 {
        let x = (lon - self.center_lon) * self.lon_factor * self.scale;
        let y = (lat - self.center_lat) * self.scale;
        Pos2::new(self.origin.x + x as f32, self.origin.y - y as f32)
    }

    pub fn unproject(&self, pos: Pos2) -> Point {
        let dx = (pos.x - self.origin.x) as f64;
        let dy = (self.origin.y - pos.y) as f64;
        [
            self.center_lon + dx / (self.scale * self.lon_factor),
            self.center_lat + dy / self.scale,
        ]
    }
}

// ---------------------------------------------------------------------------
// Choropleth
// ---------------------------------------------------------------------------

/// Render the state choropleth. Hover shows a tooltip, click selects.
pub fn choropleth(ui: &mut Ui, state: &mut DashboardState) {
    let Some(boundaries) = state.boundaries.as_ref().filter(|b| !b.is_empty()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No state boundaries loaded.");
        });
        return;
    };

    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let rect = response.rect;
    let Some(projection) = boundaries.bounds().and_then(|b| Projection::fit(b, rect)) else {
        return;
    };

    let hovered = response
        .hover_pos()
        .and_then(|pos| {
            let [lon, lat] = projection.unproject(pos);
            boundaries.shape_at(lon, lat)
        })
        .map(|s| s.name.clone());

    paint_shapes(&painter, state, boundaries, &projection, hovered.as_deref());
    paint_legend(ui, &painter, rect, state);

    let clicked = response.clicked().then(|| hovered.clone()).flatten();

    if let Some(name) = &hovered {
        let record = state.dataset.as_ref().and_then(|d| d.find(name));
        let lines = tooltip_lines(name, record);
        response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            ui.strong(&lines[0]);
            for line in &lines[1..] {
                ui.label(line);
            }
        });
    }

    if let Some(name) = clicked {
        state.select_state(&name);
    }
}

fn paint_shapes(
    painter: &egui::Painter,
    state: &DashboardState,
    boundaries: &StateBoundaries,
    projection: &Projection,
    hovered: Option<&str>,
) {
    let outline = Stroke::new(0.6, Color32::WHITE);
    let selected_outline = Stroke::new(2.0, Color32::BLACK);
    let selected = state.selected_state.as_deref();

    for shape in &boundaries.shapes {
        let mut fill = state.fill_for(&shape.name);
        if hovered == Some(shape.name.as_str()) {
            fill = highlight(fill);
        }

        for polygon in &shape.polygons {
            let mut mesh = Mesh::default();
            for &p in &polygon.exterior {
                mesh.colored_vertex(projection.project(p), fill);
            }
            for &[a, b, c] in &polygon.triangles {
                mesh.add_triangle(a as u32, b as u32, c as u32);
            }
            painter.add(Shape::mesh(mesh));
        }

        paint_outline(painter, shape, projection, outline);
    }

    // Drawn last so neighbouring fills do not cover it.
    if let Some(shape) = selected.and_then(|s| boundaries.find(s)) {
        paint_outline(painter, shape, projection, selected_outline);
    }
}

fn paint_outline(
    painter: &egui::Painter,
    shape: &StateShape,
    projection: &Projection,
    stroke: Stroke,
) {
    for polygon in &shape.polygons {
        for ring in polygon.rings() {
            let points: Vec<Pos2> = ring.iter().map(|&p| projection.project(p)).collect();
            painter.add(Shape::closed_line(points, stroke));
        }
    }
}

fn paint_legend(ui: &Ui, painter: &egui::Painter, rect: Rect, state: &DashboardState) {
    let entries = state.map_mode.legend();
    let row_height = 18.0;
    let size = Vec2::new(190.0, row_height * (entries.len() as f32 + 1.0) + 12.0);
    let frame = Rect::from_min_size(rect.right_bottom() - size - Vec2::splat(8.0), size);

    let visuals = ui.visuals();
    painter.rect_filled(frame, 4.0, visuals.extreme_bg_color.gamma_multiply(0.9));

    let text_color = visuals.text_color();
    let mut cursor = frame.left_top() + Vec2::new(8.0, 6.0 + row_height / 2.0);
    painter.text(
        cursor,
        Align2::LEFT_CENTER,
        state.map_mode.label(),
        FontId::proportional(13.0),
        text_color,
    );
    for (label, color) in entries {
        cursor.y += row_height;
        let swatch = Rect::from_center_size(cursor + Vec2::new(6.0, 0.0), Vec2::splat(12.0));
        painter.rect_filled(swatch, 2.0, color);
        painter.text(
            cursor + Vec2::new(18.0, 0.0),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(12.0),
            text_color,
        );
    }
}
