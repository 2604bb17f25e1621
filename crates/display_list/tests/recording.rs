//! End-to-end recording and replay behavior.

#![allow(clippy::expect_used, reason = "tests fail loudly on a missing value")]

use std::sync::Arc;

use display_core::effects::ImageFilter;
use display_core::{BlendMode, Color, Image, Matrix, Paint, Point, Rect};
use display_list::{ClipOp, DisplayListBuilder, DisplayListReceiver, SaveLayerOptions};

const CULL: Rect = Rect::from_ltrb(0.0, 0.0, 100.0, 100.0);

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Save,
    SaveLayer,
    Restore,
    Translate(f32, f32),
    DrawRect(Rect),
    DrawColor(Color, BlendMode),
    DrawDisplayList,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl DisplayListReceiver for Recorder {
    fn save(&mut self) {
        self.events.push(Event::Save);
    }

    fn save_layer(&mut self, _options: &SaveLayerOptions) {
        self.events.push(Event::SaveLayer);
    }

    fn restore(&mut self) {
        self.events.push(Event::Restore);
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.events.push(Event::Translate(tx, ty));
    }

    fn draw_rect(&mut self, rect: &Rect) {
        self.events.push(Event::DrawRect(*rect));
    }

    fn draw_color(&mut self, color: Color, mode: BlendMode) {
        self.events.push(Event::DrawColor(color, mode));
    }

    fn draw_display_list(
        &mut self,
        _list: &Arc<display_list::DisplayList>,
        _opacity: f32,
    ) {
        self.events.push(Event::DrawDisplayList);
    }
}

fn replay(list: &display_list::DisplayList) -> Vec<Event> {
    let mut recorder = Recorder::default();
    list.dispatch(&mut recorder);
    recorder.events
}

#[test]
fn save_translate_draw_restore_round_trip() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.save();
    builder.translate(10.0, 10.0);
    builder.draw_rect(&Rect::from_ltrb(0.0, 0.0, 5.0, 5.0));
    builder.restore();
    let list = builder.build();

    assert_eq!(list.bounds(), Rect::from_ltrb(10.0, 10.0, 15.0, 15.0));
    assert_eq!(
        replay(&list),
        vec![
            Event::Save,
            Event::Translate(10.0, 10.0),
            Event::DrawRect(Rect::from_ltrb(0.0, 0.0, 5.0, 5.0)),
            Event::Restore,
        ]
    );
}

#[test]
fn elided_scopes_never_replay() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.save();
    builder.restore();
    builder.save();
    builder.save();
    builder.restore();
    builder.restore();
    let list = builder.build();
    assert_eq!(list.op_count(), 0);
    assert!(replay(&list).is_empty());
}

#[test]
fn rtree_entries_match_recording_order() {
    let mut builder = DisplayListBuilder::new(&CULL, true);
    builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
    builder.draw_circle(Point::new(30.0, 5.0), 5.0);
    builder.draw_oval(&Rect::from_xywh(50.0, 0.0, 10.0, 10.0));
    let list = builder.build();

    let rtree = list.rtree().expect("rtree was requested");
    let entries: Vec<_> = rtree.entries().collect();
    assert_eq!(entries.len(), 3);
    let indices: Vec<_> = entries.iter().map(|(_, index)| *index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));

    let hits = rtree.search(&Rect::from_xywh(25.0, 0.0, 10.0, 10.0));
    assert_eq!(hits, vec![1]);
}

#[test]
fn src_over_content_is_group_opacity_compatible() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.set_blend_mode(BlendMode::SrcOver);
    builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
    let list = builder.build();
    assert!(list.can_apply_group_opacity());
    assert_eq!(list.max_blend_mode(), BlendMode::SrcOver);
}

#[test]
fn multiply_content_is_not_group_opacity_compatible() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.set_blend_mode(BlendMode::Multiply);
    builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
    let list = builder.build();
    assert!(!list.can_apply_group_opacity());
    assert_eq!(list.max_blend_mode(), BlendMode::Multiply);
}

#[test]
fn overlapping_content_is_not_group_opacity_compatible() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
    builder.draw_rect(&Rect::from_xywh(5.0, 5.0, 10.0, 10.0));
    let list = builder.build();
    assert!(!list.can_apply_group_opacity());
}

#[test]
fn flood_ops_accumulate_the_cull_rect() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.draw_color(Color::WHITE, BlendMode::SrcOver);
    let list = builder.build();
    assert_eq!(list.bounds(), CULL);
    assert_eq!(
        replay(&list),
        vec![Event::DrawColor(Color::WHITE, BlendMode::SrcOver)]
    );
}

#[test]
fn nop_layer_elides_content_but_keeps_attributes() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let invisible = Paint { blend_mode: BlendMode::Dst, ..Paint::default() };
    builder.save_layer(None, Some(&invisible), None);
    builder.set_color(Color::WHITE);
    builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
    builder.restore();

    // The attribute ops survive so later replay state stays correct; the
    // layer itself and its draw are gone.
    assert_eq!(builder.current_attributes().color, Color::WHITE);
    builder.set_blend_mode(BlendMode::SrcOver);
    builder.draw_rect(&Rect::from_xywh(20.0, 20.0, 10.0, 10.0));
    let list = builder.build();
    assert_eq!(list.bounds(), Rect::from_ltrb(20.0, 20.0, 30.0, 30.0));
    let events = replay(&list);
    assert_eq!(events.iter().filter(|event| matches!(event, Event::SaveLayer)).count(), 0);
    assert_eq!(events.iter().filter(|event| matches!(event, Event::DrawRect(_))).count(), 1);
}

#[test]
fn backdrop_filter_layer_commits_even_when_empty() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let blur = Arc::new(ImageFilter::Blur { sigma_x: 2.0, sigma_y: 2.0 });
    builder.save_layer(None, None, Some(blur));
    builder.restore();
    let list = builder.build();

    assert!(list.contains_backdrop_filter());
    let events = replay(&list);
    assert_eq!(events, vec![Event::SaveLayer, Event::Restore]);
}

#[test]
fn backdrop_filter_output_covers_the_clip() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let blur = Arc::new(ImageFilter::Blur { sigma_x: 2.0, sigma_y: 2.0 });
    builder.save_layer(None, None, Some(blur));
    builder.restore();
    let list = builder.build();

    // No content was recorded, but the filter repaints everything under
    // the clip.
    assert_eq!(list.bounds(), CULL);
}

#[test]
fn clipped_backdrop_filter_covers_the_clip_rect() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.save();
    builder.clip_rect(&Rect::from_xywh(20.0, 20.0, 30.0, 30.0), ClipOp::Intersect, false);
    let blur = Arc::new(ImageFilter::Blur { sigma_x: 2.0, sigma_y: 2.0 });
    builder.save_layer(None, None, Some(blur));
    builder.restore();
    builder.restore();
    let list = builder.build();

    assert_eq!(list.bounds(), Rect::from_ltrb(20.0, 20.0, 50.0, 50.0));
}

#[test]
fn filtered_layer_expands_bounds_and_rewrites_rtree() {
    let mut builder = DisplayListBuilder::new(&CULL, true);
    let layer_paint = Paint {
        image_filter: Some(Arc::new(ImageFilter::Blur { sigma_x: 1.0, sigma_y: 1.0 })),
        ..Paint::default()
    };
    builder.save_layer(None, Some(&layer_paint), None);
    // The filter belongs to the layer composite, not to the ops inside it.
    builder.set_image_filter(None);
    builder.draw_rect(&Rect::from_xywh(10.0, 10.0, 10.0, 10.0));
    builder.restore();
    let list = builder.build();

    // Blur reaches three sigmas past the content on every side.
    assert_eq!(list.bounds(), Rect::from_ltrb(7.0, 7.0, 23.0, 23.0));
    let rtree = list.rtree().expect("rtree was requested");
    let entries: Vec<_> = rtree.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, Rect::from_ltrb(7.0, 7.0, 23.0, 23.0));
}

#[test]
fn nested_list_folds_counts_depth_and_bounds() {
    let mut inner = DisplayListBuilder::new(&CULL, false);
    inner.draw_rect(&Rect::from_xywh(0.0, 0.0, 5.0, 5.0));
    let inner = Arc::new(inner.build());
    assert_eq!(inner.total_depth(), 1);

    let mut outer = DisplayListBuilder::new(&CULL, false);
    outer.translate(10.0, 10.0);
    outer.draw_display_list(&inner, 1.0);
    let list = outer.build();

    assert_eq!(list.bounds(), Rect::from_ltrb(10.0, 10.0, 15.0, 15.0));
    assert_eq!(list.op_count(), 2);
    assert_eq!(list.total_op_count(), 3);
    assert!(list.total_byte_size() > list.byte_size());
    // The embedded list's depth plus one compositing pass.
    assert_eq!(list.total_depth(), 2);
    assert!(list.can_apply_group_opacity());
    assert_eq!(
        replay(&list),
        vec![Event::Translate(10.0, 10.0), Event::DrawDisplayList]
    );
}

#[test]
fn unsafe_image_poisons_thread_safety() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let texture = Arc::new(Image::new_texture_backed(1, 8, 8));
    builder.draw_image(&texture, Point::new(0.0, 0.0), false);
    let list = builder.build();
    assert!(!list.is_ui_thread_safe());

    let mut outer = DisplayListBuilder::new(&CULL, false);
    outer.draw_display_list(&Arc::new(list), 1.0);
    assert!(!outer.build().is_ui_thread_safe());
}

#[test]
fn safe_recording_reports_thread_safe() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let image = Arc::new(Image::new(1, 8, 8));
    builder.draw_image(&image, Point::new(0.0, 0.0), false);
    assert!(builder.build().is_ui_thread_safe());
}

#[test]
fn clipped_out_draw_is_recorded_but_grows_nothing() {
    let mut builder = DisplayListBuilder::new(&CULL, true);
    builder.draw_rect(&Rect::from_xywh(500.0, 500.0, 10.0, 10.0));
    let list = builder.build();
    assert_eq!(list.op_count(), 1);
    assert_eq!(list.bounds(), Rect::EMPTY);
    assert_eq!(list.rtree().expect("rtree was requested").len(), 0);
}

#[test]
fn degenerate_geometry_is_accepted() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    builder.draw_rect(&Rect::from_ltrb(5.0, 5.0, 5.0, 10.0));
    builder.draw_points(display_list::PointMode::Points, &[]);
    let list = builder.build();
    assert_eq!(list.op_count(), 1);
    assert_eq!(list.bounds(), Rect::EMPTY);
}

#[test]
fn set_transform_round_trips_through_replay_state() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let target = Matrix::from_affine(0.0, -1.0, 40.0, 1.0, 0.0, 0.0);
    builder.set_transform(&target);
    assert_eq!(*builder.current_transform(), target);
    builder.translate(1.0, 2.0);
    builder.set_transform(&Matrix::IDENTITY);
    assert!(builder.current_transform().is_identity());
}

#[test]
fn save_restore_balance_is_preserved() {
    let mut builder = DisplayListBuilder::new(&CULL, false);
    let base = builder.save_count();
    for _ in 0..4 {
        builder.save();
        builder.draw_rect(&Rect::from_xywh(0.0, 0.0, 1.0, 1.0));
    }
    builder.save_layer(None, None, None);
    builder.restore_to_count(base);
    assert_eq!(builder.save_count(), base);
}
