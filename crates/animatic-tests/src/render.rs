//! Integration tests for the compositor against a live timeline model.

use std::collections::HashMap;

use animatic_core::{Bitmap, Color, PanelId, Panel, Surface, Time};
use animatic_render::{Compositor, CompositorOptions, TransitionRegistry, Watermark, WatermarkCorner};
use animatic_timeline::{KenBurnsUpdate, TimelineModel, TransitionKind};

// ── Helpers ────────────────────────────────────────────────────

fn storyboard(colors: &[Color]) -> (Vec<Panel>, TimelineModel, HashMap<String, Bitmap>) {
    let mut panels = Vec::new();
    let mut assets = HashMap::new();
    for (i, color) in colors.iter().enumerate() {
        let url = format!("board/{i}.png");
        assets.insert(url.clone(), Bitmap::solid(16, 16, *color));
        panels.push(Panel::with_url(PanelId::generate(), format!("Board {i}"), url));
    }
    let ids: Vec<PanelId> = panels.iter().map(|p| p.id).collect();
    let mut model = TimelineModel::new();
    model.initialize_panels(&ids);
    (panels, model, assets)
}

fn render_at(
    panels: &[Panel],
    model: &TimelineModel,
    assets: &HashMap<String, Bitmap>,
    millis: i64,
) -> Surface {
    let compositor = Compositor::default();
    let mut surface = Surface::new(16, 16);
    compositor.render_frame(&mut surface, panels, assets, model, Time::from_millis(millis));
    surface
}

// ── Hold phase and transitions ─────────────────────────────────

#[test]
fn hold_phase_shows_active_panel() {
    let (panels, model, assets) = storyboard(&[Color::WHITE, Color::BLACK]);
    // defaults are 3000ms per panel with a 500ms transition tail
    let frame = render_at(&panels, &model, &assets, 1000);
    assert_eq!(frame.pixel(8, 8), [255, 255, 255, 255]);
    let frame = render_at(&panels, &model, &assets, 3500);
    assert_eq!(frame.pixel(8, 8), [0, 0, 0, 255]);
}

#[test]
fn every_transition_resolves_to_incoming_panel() {
    let (panels, mut model, assets) = storyboard(&[Color::BLACK, Color::WHITE]);
    let registry = TransitionRegistry::with_builtins();
    for kind in registry.kinds() {
        model.set_panel_transition(panels[0].id, kind, Some(Time::from_millis(1000)));
        // a hair before the window closes the incoming panel dominates
        let frame = render_at(&panels, &model, &assets, 2999);
        assert!(frame.pixel(8, 8)[0] >= 250, "transition {}", kind.name());
    }
}

#[test]
fn wipe_midway_splits_the_frame() {
    let (panels, mut model, assets) = storyboard(&[Color::BLACK, Color::WHITE]);
    model.set_panel_transition(
        panels[0].id,
        TransitionKind::WipeLeft,
        Some(Time::from_millis(1000)),
    );
    let frame = render_at(&panels, &model, &assets, 2500);
    assert_eq!(frame.pixel(1, 8), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(14, 8), [0, 0, 0, 255]);
}

#[test]
fn eased_transition_lags_linear_progress() {
    let (panels, mut model, assets) = storyboard(&[Color::BLACK, Color::WHITE]);
    model.set_panel_transition(
        panels[0].id,
        TransitionKind::WipeLeft,
        Some(Time::from_millis(1000)),
    );
    // ease-in-cubic at raw 0.5 is 0.125: the wipe edge sits left of center
    let timing = model.timing(panels[0].id).unwrap().clone();
    let mut update = animatic_timeline::PanelTimingUpdate::default();
    update.transition = Some(animatic_timeline::TransitionUpdate {
        easing: Some(animatic_core::Easing::EaseInCubic),
        ..Default::default()
    });
    model.update_panel_timing(timing.panel_id, &update);

    let frame = render_at(&panels, &model, &assets, 2500);
    assert_eq!(frame.pixel(1, 8), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(4, 8), [0, 0, 0, 255]);
}

// ── Ken Burns and placeholders ─────────────────────────────────

#[test]
fn ken_burns_zoom_fills_letterbox_over_time() {
    let (panels, mut model, mut assets) = storyboard(&[Color::WHITE]);
    // wide art letterboxes at rest
    assets.insert("board/0.png".into(), Bitmap::solid(16, 8, Color::WHITE));
    model.set_ken_burns_effect(
        panels[0].id,
        &KenBurnsUpdate {
            enabled: Some(true),
            start_scale: Some(1.0),
            end_scale: Some(3.0),
            ..Default::default()
        },
    );
    // at the start the letterbox band shows the background
    let frame = render_at(&panels, &model, &assets, 0);
    assert_eq!(frame.pixel(8, 1), [17, 17, 17, 255]);
    // near the end the zoom has swallowed it
    let frame = render_at(&panels, &model, &assets, 2999);
    assert_eq!(frame.pixel(8, 1), [255, 255, 255, 255]);
}

#[test]
fn missing_artwork_never_fails_a_render() {
    let (panels, model, _) = storyboard(&[Color::WHITE, Color::BLACK]);
    let empty: HashMap<String, Bitmap> = HashMap::new();
    let frame = render_at(&panels, &model, &empty, 1000);
    // placeholder card instead of panel art or bare background
    assert_eq!(frame.pixel(8, 12), [42, 42, 48, 255]);
}

#[test]
fn watermark_renders_over_transition_frames() {
    let (panels, mut model, assets) = storyboard(&[Color::BLACK, Color::BLACK]);
    model.set_panel_transition(
        panels[0].id,
        TransitionKind::Dissolve,
        Some(Time::from_millis(1000)),
    );
    let mut watermark = Watermark::new("WM");
    watermark.corner = WatermarkCorner::TopLeft;
    watermark.margin = 0;
    watermark.scale = 1;
    watermark.opacity = 1.0;
    let compositor = Compositor::new(CompositorOptions {
        watermark: Some(watermark),
        ..CompositorOptions::default()
    });

    let mut frame = Surface::new(32, 32);
    compositor.render_frame(&mut frame, &panels, &assets, &model, Time::from_millis(2500));
    let lit = (0..8).any(|y| (0..12).any(|x| frame.pixel(x, y)[0] > 100));
    assert!(lit);
}
