//! Glyph quad geometry

use crate::foundation::math::Vec2;

use super::metrics::GlyphMetric;

/// Two triangles covering a quad's four corners
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Screen-space rectangle of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Bottom-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl GlyphQuad {
    /// Place `metric` with its pen position on the baseline at `pen`
    #[allow(clippy::cast_precision_loss)]
    pub fn new(metric: &GlyphMetric, pen: Vec2, scale: f32) -> Self {
        let size = Vec2::new(metric.size.x as f32, metric.size.y as f32) * scale;
        let descent = (metric.size.y as f32 - metric.bearing.y as f32) * scale;
        Self {
            origin: Vec2::new(pen.x + metric.bearing.x as f32 * scale, pen.y - descent),
            size,
        }
    }

    /// Interleaved (x, y, u, v) vertices matching [`QUAD_INDICES`]
    ///
    /// The bitmap's top row sits at v = 0.
    pub fn vertices(&self) -> [f32; 16] {
        let (x, y) = (self.origin.x, self.origin.y);
        let (w, h) = (self.size.x, self.size.y);
        [
            x, y, 0.0, 1.0, //
            x + w, y, 1.0, 1.0, //
            x + w, y + h, 1.0, 0.0, //
            x, y + h, 0.0, 0.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn test_descender_drops_below_baseline() {
        // 'g'-like glyph: 20 px tall with 5 px below the baseline
        let metric = GlyphMetric::new(Vector2::new(10, 20), Vector2::new(2, 15), 768);
        let quad = GlyphQuad::new(&metric, Vec2::new(100.0, 50.0), 0.5);

        assert_relative_eq!(quad.origin.x, 101.0);
        assert_relative_eq!(quad.origin.y, 47.5);
        assert_relative_eq!(quad.size.x, 5.0);
        assert_relative_eq!(quad.size.y, 10.0);

        let v = quad.vertices();
        assert_relative_eq!(v[4], 106.0);
        assert_relative_eq!(v[9], 57.5);
        assert_relative_eq!(v[3], 1.0);
        assert_relative_eq!(v[15], 0.0);
    }

    #[test]
    fn test_bitmap_top_row_lands_on_screen_top() {
        use crate::foundation::math::{screen_projection, Extent};

        let metric = GlyphMetric::new(Vector2::new(24, 32), Vector2::new(4, 32), 2048);
        let quad = GlyphQuad::new(&metric, Vec2::new(10.0, 10.0), 1.0);
        let v = quad.vertices();
        let projection = screen_projection(Extent::new(200, 100));

        let clip_y = |i: usize| projection.transform_point(&nalgebra::Point3::new(v[i * 4], v[i * 4 + 1], 0.0)).y;
        // Vertex 3 samples v = 0, vertex 0 samples v = 1
        assert_relative_eq!(v[3 * 4 + 3], 0.0);
        assert!(clip_y(3) < clip_y(0));
    }
}
