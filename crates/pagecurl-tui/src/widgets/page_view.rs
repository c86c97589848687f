use pagecurl_core::geometry::{Point, Polygon};
use pagecurl_core::RenderNode;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};

use crate::app::App;
use crate::images::{FittedImage, PageImageCache};
use crate::theme::Theme;

/// Line segments per quadratic bend when flattening clip paths
const CURVE_SEGMENTS: usize = 16;

pub struct PageWidget;

/// One render layer resolved for rasterising
struct PreparedLayer<'a> {
    polygon: Polygon,
    fill: Color,
    image: Option<&'a FittedImage>,
}

impl PreparedLayer<'_> {
    fn color_at(&self, p: Point) -> Option<Color> {
        if !self.polygon.contains(p) {
            return None;
        }
        let artwork = self
            .image
            .and_then(|image| image.pixel(p.x as u32, p.y as u32))
            .filter(|px| px[3] > 0)
            .map(|px| Color::Rgb(px[0], px[1], px[2]));
        Some(artwork.unwrap_or(self.fill))
    }
}

impl PageWidget {
    /// Render the current page with half-block cells
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let node = app.render_node();
        rasterize(&node, &app.images, &app.theme, frame.buffer_mut(), area);
    }
}

/// Draw `node` into `area`, two surface pixels per cell.
///
/// Each pixel takes the colour of the topmost layer whose clip contains it:
/// artwork where the fitted image covers it, the page tint elsewhere. Pixels
/// outside every clip show the theme background.
pub fn rasterize(node: &RenderNode, images: &PageImageCache, theme: &Theme, buf: &mut Buffer, area: Rect) {
    let layers: Vec<PreparedLayer> = node
        .layers
        .iter()
        .map(|layer| PreparedLayer {
            polygon: layer.clip.flatten(CURVE_SEGMENTS),
            fill: theme.fill(&layer.fill_color),
            image: layer.image.as_ref().and_then(|image| images.fitted(image.path())),
        })
        .collect();

    let color_at = |p: Point| {
        layers
            .iter()
            .rev()
            .find_map(|layer| layer.color_at(p))
            .unwrap_or(theme.background)
    };

    for row in 0..area.height {
        for col in 0..area.width {
            let x = f64::from(col) + 0.5;
            let top = color_at(Point::new(x, f64::from(row) * 2.0 + 0.5));
            let bottom = color_at(Point::new(x, f64::from(row) * 2.0 + 1.5));

            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol("▀").set_fg(top).set_bg(bottom);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecurl_core::geometry::{curl_path, ClipPath, Size};
    use pagecurl_core::RenderLayer;

    fn layer(page_index: usize, clip: ClipPath, fill: &str) -> RenderLayer {
        RenderLayer {
            page_index,
            clip,
            fill_color: fill.to_string(),
            image: None,
        }
    }

    fn cell_colors(buf: &Buffer, x: u16, y: u16) -> (Color, Color) {
        let cell = buf.cell((x, y)).unwrap();
        (cell.fg, cell.bg)
    }

    #[test]
    fn test_flat_page_fills_every_cell() {
        let area = Rect::new(0, 0, 8, 4);
        let size = Size::new(8.0, 8.0).unwrap();
        let node = RenderNode {
            page_index: 0,
            layers: vec![layer(0, ClipPath::rectangle(size), "red")],
        };
        let mut buf = Buffer::empty(area);
        rasterize(&node, &PageImageCache::new(), &Theme::dark(), &mut buf, area);

        for y in 0..4 {
            for x in 0..8 {
                assert_eq!(cell_colors(&buf, x, y), (Color::Rgb(255, 0, 0), Color::Rgb(255, 0, 0)));
                assert_eq!(buf.cell((x, y)).unwrap().symbol(), "▀");
            }
        }
    }

    #[test]
    fn test_curl_reveals_underlay() {
        let area = Rect::new(0, 0, 20, 10);
        let size = Size::new(20.0, 20.0).unwrap();
        let green = Color::Rgb(0, 128, 0);
        let red = Color::Rgb(255, 0, 0);
        // Pull the bottom-right bend all the way to the left edge
        let node = RenderNode {
            page_index: 0,
            layers: vec![
                layer(1, ClipPath::rectangle(size), "green"),
                layer(0, curl_path(size, Some(Point::new(0.0, 20.0)), None), "red"),
            ],
        };
        let mut buf = Buffer::empty(area);
        rasterize(&node, &PageImageCache::new(), &Theme::dark(), &mut buf, area);

        // Top-left stays on the page, bottom-right shows the page underneath
        assert_eq!(cell_colors(&buf, 0, 0), (red, red));
        assert_eq!(cell_colors(&buf, 19, 9), (green, green));
    }

    #[test]
    fn test_uncovered_pixels_use_background() {
        let area = Rect::new(0, 0, 10, 5);
        let size = Size::new(10.0, 10.0).unwrap();
        let theme = Theme::dark();
        let node = RenderNode {
            page_index: 0,
            layers: vec![layer(0, curl_path(size, Some(Point::new(0.0, 10.0)), None), "red")],
        };
        let mut buf = Buffer::empty(area);
        rasterize(&node, &PageImageCache::new(), &theme, &mut buf, area);

        assert_eq!(cell_colors(&buf, 9, 4), (theme.background, theme.background));
    }

    #[test]
    fn test_offset_area() {
        let area = Rect::new(3, 2, 4, 2);
        let size = Size::new(4.0, 4.0).unwrap();
        let node = RenderNode {
            page_index: 0,
            layers: vec![layer(0, ClipPath::rectangle(size), "#0000ff")],
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 6));
        rasterize(&node, &PageImageCache::new(), &Theme::dark(), &mut buf, area);

        assert_eq!(cell_colors(&buf, 3, 2), (Color::Rgb(0, 0, 255), Color::Rgb(0, 0, 255)));
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
    }
}
