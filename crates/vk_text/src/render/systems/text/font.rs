//! Font: glyph cache, per-frame draw pool and paragraph drawing
//!
//! A [`Font`] owns everything it creates: glyph metrics, one texture per
//! glyph with a visible bitmap, a descriptor pool and the per-frame draw
//! slots. The device, pipeline, sampler and projection uniform are borrowed
//! from the caller for each call through [`DrawContext`].

use std::collections::HashMap;
use std::path::Path;

use crate::core::config::TextConfig;
use crate::foundation::math::{Extent, Vec2};
use crate::render::backend::{CommandSink, DrawContext, GpuBackend};
use crate::render::frame_pool::{DrawSlot, FrameResources, FrameSet, SlotEntry, FRAMES_IN_FLIGHT};

use super::error::FontResult;
use super::glyph_quad::{GlyphQuad, QUAD_INDICES};
use super::metrics::GlyphMetrics;
use super::paragraph::{lay_out, HorizontalAlignment, ParagraphLayout, TextStyle};
use super::rasterizer::{FontdueFace, GlyphSource};
use super::text_layout::TextMeasure;

/// A loaded font ready to draw text
pub struct Font<B: GpuBackend> {
    name: String,
    metrics: GlyphMetrics,
    textures: HashMap<char, B::Texture>,
    descriptor_pool: B::DescriptorPool,
    frames: FrameSet<B>,
    reference_resolution: Extent,
}

impl<B: GpuBackend> Font<B> {
    /// Load a font file and rasterize the configured character range
    pub fn load(gpu: &mut B, name: impl Into<String>, path: impl AsRef<Path>, config: &TextConfig) -> FontResult<Self> {
        let face = FontdueFace::open(path, config.base_font_height)?;
        Self::from_source(gpu, name, &face, config)
    }

    /// Build a font from any glyph source
    ///
    /// Code points the source does not define are skipped. Any rasterizer or
    /// GPU failure aborts the whole load and releases what was created.
    pub fn from_source<G: GlyphSource + ?Sized>(
        gpu: &mut B,
        name: impl Into<String>,
        source: &G,
        config: &TextConfig,
    ) -> FontResult<Self> {
        config.validate()?;
        let name = name.into();

        let mut metrics = GlyphMetrics::new(source.pixel_height());
        let mut textures = HashMap::new();
        let mut undefined = 0usize;

        for ch in config.char_range() {
            if !source.defines(ch) {
                undefined += 1;
                continue;
            }

            let glyph = source.rasterize(ch)?;
            if glyph.metric.has_area() {
                let texture = gpu.create_glyph_texture(glyph.metric.size.x, glyph.metric.size.y, &glyph.bitmap)?;
                textures.insert(ch, texture);
            }
            metrics.insert(ch, glyph.metric);
        }

        if undefined > 0 {
            log::warn!("Font '{}' does not define {} requested code points", name, undefined);
        }

        #[allow(clippy::cast_possible_truncation)]
        let max_sets = u32::try_from(metrics.len())
            .unwrap_or(u32::MAX)
            .max(1)
            .saturating_mul(FRAMES_IN_FLIGHT as u32)
            .saturating_mul(config.descriptor_multiplier);
        let descriptor_pool = gpu.create_descriptor_pool(max_sets)?;

        log::info!(
            "Loaded font '{}': {} glyphs, {} textures, descriptor pool of {} sets",
            name,
            metrics.len(),
            textures.len(),
            max_sets
        );

        Ok(Self {
            name,
            metrics,
            textures,
            descriptor_pool,
            frames: FrameSet::new(),
            reference_resolution: config.reference_resolution,
        })
    }

    /// Name the font was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Glyph metrics at the base height
    pub const fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Number of glyphs with an uploaded texture
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Whether `ch` has a texture to draw
    pub fn has_texture(&self, ch: char) -> bool {
        self.textures.contains_key(&ch)
    }

    /// Per-frame draw state of `frame`
    pub fn frame(&self, frame: usize) -> FontResult<&FrameResources<B>> {
        Ok(self.frames.get(frame)?)
    }

    /// Layout measurements at `font_size`
    pub fn measure(&self, font_size: f32) -> TextMeasure<'_> {
        TextMeasure::new(&self.metrics, font_size)
    }

    /// Width of the first row of `text` wrapped at `row_width`
    pub fn row_width(&self, text: &str, font_size: f32, row_width: f32) -> FontResult<f32> {
        let chars: Vec<char> = text.chars().collect();
        self.measure(font_size).row_width(&chars, row_width)
    }

    /// Number of rows `text` occupies wrapped at `row_width`
    pub fn row_count(&self, text: &str, font_size: f32, row_width: f32) -> FontResult<usize> {
        self.measure(font_size).row_count(text, row_width)
    }

    /// Glyph placement for `text` relative to its pen origin
    pub fn lay_out(
        &self,
        text: &str,
        font_size: f32,
        row_width: f32,
        halign: HorizontalAlignment,
    ) -> FontResult<ParagraphLayout> {
        lay_out(&self.measure(font_size), text, row_width, halign)
    }

    /// Draw `text` with position, size and row width given at the reference resolution
    ///
    /// x and the row width scale with the surface width, y and the font size
    /// with the surface height.
    pub fn render_text_rel<S: CommandSink<B>>(
        &mut self,
        ctx: &mut DrawContext<'_, B, S>,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> FontResult<usize> {
        let scale = ctx.extent.scale_from(self.reference_resolution);
        let style = TextStyle {
            size: style.size * scale.y,
            row_width: style.row_width * scale.x,
            ..*style
        };
        self.render_text_abs(ctx, text, x * scale.x, y * scale.y, &style)
    }

    /// Draw `text` with its pen origin at (`x`, `y`) in surface pixels
    ///
    /// Returns the number of glyph draws recorded. The whole paragraph is
    /// laid out before anything is recorded, so text with an unknown
    /// character records nothing.
    pub fn render_text_abs<S: CommandSink<B>>(
        &mut self,
        ctx: &mut DrawContext<'_, B, S>,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> FontResult<usize> {
        let frame_index = ctx.frame;
        self.frames.get(frame_index)?;

        let layout = self.lay_out(text, style.size, style.row_width, style.halign)?;
        if !layout.glyphs.iter().any(|glyph| self.textures.contains_key(&glyph.ch)) {
            return Ok(0);
        }

        let origin_y = y + layout.height() * style.valign.factor();
        let scale = self.metrics.scale(style.size);

        let gpu = &mut *ctx.gpu;
        let commands = &mut *ctx.commands;
        let projection = ctx.projection;
        let frame = self.frames.get_mut(frame_index)?;

        let color_bytes = bytemuck::bytes_of(&style.color);
        let color: &B::Buffer = match frame.colors.next_slot() {
            SlotEntry::Occupied(buffer) => {
                gpu.write_uniform_buffer(buffer, color_bytes)?;
                buffer
            }
            SlotEntry::Vacant(slot) => slot.insert(gpu.create_uniform_buffer(color_bytes)?),
        };

        let mut drawn = 0;
        for glyph in &layout.glyphs {
            let Some(texture) = self.textures.get(&glyph.ch) else {
                continue;
            };
            let metric = self.metrics.get(glyph.ch)?;
            let vertices = GlyphQuad::new(metric, Vec2::new(x + glyph.x, origin_y + glyph.y), scale).vertices();

            let slot: &DrawSlot<B> = match frame.slots.next_slot() {
                SlotEntry::Occupied(slot) => {
                    slot.restage(gpu, &vertices)?;
                    slot
                }
                SlotEntry::Vacant(slot) => {
                    log::debug!("Font '{}' growing draw slots of frame {}", self.name, frame_index);
                    slot.insert(DrawSlot::create(gpu, &vertices, &QUAD_INDICES)?)
                }
            };

            let set = gpu.allocate_glyph_descriptor(&self.descriptor_pool, texture, color, projection)?;
            frame.descriptor_sets.push(set);

            if drawn == 0 {
                commands.bind_pipeline();
            }
            commands.bind_vertex_buffer(&slot.vertices);
            commands.bind_index_buffer(&slot.indices);
            commands.bind_descriptor_set(set);
            #[allow(clippy::cast_possible_truncation)]
            commands.draw_indexed(QUAD_INDICES.len() as u32);
            drawn += 1;
        }

        log::trace!("Font '{}' recorded {} glyph draws for frame {}", self.name, drawn, frame_index);
        Ok(drawn)
    }

    /// Start a new recording of `frame`
    ///
    /// Rewinds the frame's draw slots and color payloads and frees its
    /// descriptor sets. Safe to call repeatedly.
    pub fn clear_buffers(&mut self, gpu: &mut B, frame: usize) -> FontResult<()> {
        self.frames.get_mut(frame)?.reset(gpu, &self.descriptor_pool)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::{HeadlessBackend, HeadlessBuffer, RecordingSink};
    use crate::render::systems::text::error::FontError;
    use crate::render::systems::text::paragraph::VerticalAlignment;
    use crate::render::systems::text::test_support::{MonospaceSource, GLYPH_BEARING_X, GLYPH_SIZE};
    use crate::render::{Color, RenderError};
    use approx::assert_relative_eq;

    struct Fixture {
        gpu: HeadlessBackend,
        sink: RecordingSink,
        projection: HeadlessBuffer,
        font: Font<HeadlessBackend>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with(&MonospaceSource::new(), &TextConfig::default())
        }

        fn with(source: &MonospaceSource, config: &TextConfig) -> Self {
            let mut gpu = HeadlessBackend::new();
            let font = Font::from_source(&mut gpu, "mono", source, config).unwrap();
            let projection = gpu.create_uniform_buffer(&[0; 64]).unwrap();
            Self {
                gpu,
                sink: RecordingSink::new(),
                projection,
                font,
            }
        }

        fn render(&mut self, frame: usize, text: &str, x: f32, y: f32, style: &TextStyle) -> FontResult<usize> {
            let mut ctx = DrawContext::new(
                &mut self.gpu,
                &mut self.sink,
                &self.projection,
                frame,
                Extent::new(1920, 1080),
            );
            self.font.render_text_abs(&mut ctx, text, x, y, style)
        }

        fn render_rel(&mut self, extent: Extent, text: &str, x: f32, y: f32, style: &TextStyle) -> FontResult<usize> {
            let mut ctx = DrawContext::new(&mut self.gpu, &mut self.sink, &self.projection, 0, extent);
            self.font.render_text_rel(&mut ctx, text, x, y, style)
        }

        fn first_quad(&self, frame: usize) -> Vec<f32> {
            let slots = self.font.frame(frame).unwrap().active_slots();
            slots[0].vertices.to_f32()
        }
    }

    #[test]
    fn test_load_skips_textures_for_blank_glyphs() {
        let fixture = Fixture::new();
        assert_eq!(fixture.font.metrics().len(), 95);
        assert_eq!(fixture.font.texture_count(), 94);
        assert!(!fixture.font.has_texture(' '));
        assert_eq!(fixture.gpu.stats().textures_created, 94);
    }

    #[test]
    fn test_undefined_code_points_are_skipped() {
        let fixture = Fixture::with(&MonospaceSource::new().without(&['~', '|']), &TextConfig::default());
        assert_eq!(fixture.font.metrics().len(), 93);
        assert!(!fixture.font.metrics().contains('~'));
    }

    #[test]
    fn test_rasterizer_failure_aborts_load() {
        let mut gpu = HeadlessBackend::new();
        let source = MonospaceSource::new().failing_on('x');
        let result = Font::from_source(&mut gpu, "broken", &source, &TextConfig::default());
        assert!(matches!(result, Err(FontError::Rasterize('x', _))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut gpu = HeadlessBackend::new();
        let config = TextConfig::default().with_char_range(126, 32);
        let result = Font::from_source(&mut gpu, "mono", &MonospaceSource::new(), &config);
        assert!(matches!(result, Err(FontError::Config(_))));
    }

    #[test]
    fn test_short_text_draws_each_glyph() {
        let mut fixture = Fixture::new();
        let drawn = fixture.render(0, "Hi", 0.0, 0.0, &TextStyle::default()).unwrap();

        assert_eq!(drawn, 2);
        assert_eq!(fixture.sink.draw_count(), 2);
        assert_eq!(fixture.font.frame(0).unwrap().descriptor_sets().len(), 2);
        assert_eq!(fixture.font.frame(0).unwrap().slots_in_use(), 2);
    }

    #[test]
    fn test_spaces_advance_without_drawing() {
        let mut fixture = Fixture::new();
        let drawn = fixture.render(0, "a  b\n", 0.0, 0.0, &TextStyle::default()).unwrap();
        assert_eq!(drawn, 2);

        let drawn = fixture.render(0, "   ", 0.0, 0.0, &TextStyle::default()).unwrap();
        assert_eq!(drawn, 0);
        assert_eq!(fixture.font.frame(0).unwrap().colors_in_use(), 1);
    }

    #[test]
    fn test_every_glyph_of_a_call_shares_its_color() {
        let mut fixture = Fixture::new();
        let style = TextStyle::default().with_color(Color::RED);
        fixture.render(0, "ab", 0.0, 0.0, &style).unwrap();

        let sets = fixture.sink.bound_sets();
        let first = fixture.gpu.binding(sets[0]).unwrap();
        let second = fixture.gpu.binding(sets[1]).unwrap();
        assert_eq!(first.color, second.color);
        assert_eq!(first.projection, fixture.projection.id());
        assert_ne!(first.texture, second.texture);
    }

    #[test]
    fn test_center_alignment_shifts_by_half_row_width() {
        let mut fixture = Fixture::new();
        let style = TextStyle::default().with_alignment(HorizontalAlignment::Center, VerticalAlignment::Top);
        fixture.render(0, "ab", 500.0, 300.0, &style).unwrap();

        // Row is 64 px wide, so the pen starts at 500 - 32
        let quad = fixture.first_quad(0);
        assert_relative_eq!(quad[0], 468.0 + GLYPH_BEARING_X);
        assert_relative_eq!(quad[1], 300.0);
    }

    #[test]
    fn test_bottom_alignment_raises_first_baseline() {
        let mut fixture = Fixture::new();
        let style = TextStyle::default().with_alignment(HorizontalAlignment::Left, VerticalAlignment::Bottom);
        fixture.render(0, "a\nb", 0.0, 0.0, &style).unwrap();

        let quad = fixture.first_quad(0);
        assert_relative_eq!(quad[1], 128.0);
    }

    #[test]
    fn test_relative_rendering_scales_with_surface() {
        let mut fixture = Fixture::new();
        let style = TextStyle::new(32.0);
        fixture.render_rel(Extent::new(3840, 2160), "a", 100.0, 100.0, &style).unwrap();

        let quad = fixture.first_quad(0);
        let width = quad[4] - quad[0];
        assert_relative_eq!(quad[0], 200.0 + GLYPH_BEARING_X);
        assert_relative_eq!(quad[1], 200.0);
        assert_relative_eq!(width, GLYPH_SIZE.0 as f32);
    }

    #[test]
    fn test_relative_rendering_at_reference_resolution_is_identity() {
        let mut fixture = Fixture::new();
        fixture.render_rel(Extent::new(1920, 1080), "a", 100.0, 100.0, &TextStyle::new(32.0)).unwrap();

        let quad = fixture.first_quad(0);
        assert_relative_eq!(quad[0], 100.0 + GLYPH_BEARING_X / 2.0);
        assert_relative_eq!(quad[4] - quad[0], GLYPH_SIZE.0 as f32 / 2.0);
    }

    #[test]
    fn test_clear_buffers_is_idempotent() {
        let mut fixture = Fixture::new();
        fixture.render(0, "abc", 0.0, 0.0, &TextStyle::default()).unwrap();

        for _ in 0..2 {
            fixture.font.clear_buffers(&mut fixture.gpu, 0).unwrap();
            let frame = fixture.font.frame(0).unwrap();
            assert_eq!(frame.slots_in_use(), 0);
            assert_eq!(frame.colors_in_use(), 0);
            assert!(frame.descriptor_sets().is_empty());
        }
        assert_eq!(fixture.gpu.stats().descriptor_sets_freed, 3);
    }

    #[test]
    fn test_slots_are_reused_after_clear() {
        let mut fixture = Fixture::new();
        fixture.render(0, "ab", 0.0, 0.0, &TextStyle::default()).unwrap();
        let created = fixture.gpu.stats().buffers_created;

        fixture.font.clear_buffers(&mut fixture.gpu, 0).unwrap();
        fixture.render(0, "cd", 10.0, 0.0, &TextStyle::default()).unwrap();

        let stats = fixture.gpu.stats();
        assert_eq!(stats.buffers_created, created);
        assert_eq!(stats.restages, 2);
        assert_eq!(stats.uniform_writes, 1);
        assert_eq!(fixture.font.frame(0).unwrap().slot_capacity(), 2);
        assert_relative_eq!(fixture.first_quad(0)[0], 10.0 + GLYPH_BEARING_X);
    }

    #[test]
    fn test_frames_are_independent() {
        let mut fixture = Fixture::new();
        fixture.render(0, "ab", 0.0, 0.0, &TextStyle::default()).unwrap();
        fixture.render(1, "xyz", 0.0, 0.0, &TextStyle::default()).unwrap();

        fixture.font.clear_buffers(&mut fixture.gpu, 0).unwrap();

        assert!(fixture.font.frame(0).unwrap().descriptor_sets().is_empty());
        assert_eq!(fixture.font.frame(1).unwrap().descriptor_sets().len(), 3);
        assert_eq!(fixture.font.frame(1).unwrap().slots_in_use(), 3);
    }

    #[test]
    fn test_invalid_frame_index_is_rejected() {
        let mut fixture = Fixture::new();
        let result = fixture.render(FRAMES_IN_FLIGHT, "a", 0.0, 0.0, &TextStyle::default());
        assert!(matches!(
            result,
            Err(FontError::Render(RenderError::InvalidFrame { index: 2, frames: 2 }))
        ));
        assert!(fixture.font.clear_buffers(&mut fixture.gpu, 7).is_err());
        assert!(fixture.sink.commands().is_empty());
    }

    #[test]
    fn test_missing_glyph_records_nothing() {
        let mut fixture = Fixture::with(&MonospaceSource::new().without(&['~']), &TextConfig::default());
        let result = fixture.render(0, "ab~", 0.0, 0.0, &TextStyle::default());

        assert!(matches!(result, Err(FontError::GlyphNotFound('~'))));
        assert!(fixture.sink.commands().is_empty());
        assert_eq!(fixture.font.frame(0).unwrap().slots_in_use(), 0);
    }

    #[test]
    fn test_descriptor_pool_exhaustion_is_reported() {
        // Two glyphs, two frames, one set per glyph per frame
        let config = TextConfig::default().with_char_range('a' as u32, 'b' as u32).with_descriptor_multiplier(1);
        let mut fixture = Fixture::with(&MonospaceSource::new(), &config);

        let result = fixture.render(0, "ababa", 0.0, 0.0, &TextStyle::default());
        assert!(matches!(
            result,
            Err(FontError::Render(RenderError::DescriptorAllocation(_)))
        ));
        assert_eq!(fixture.sink.draw_count(), 4);
    }
}
