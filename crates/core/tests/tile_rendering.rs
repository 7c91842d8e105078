//! Integration test: compile specs from fixtures, feed tiles through
//! per-track renderers and check the emitted primitives.

use strand_core::normalize::normalize;
use strand_core::svg::render_svg;
use strand_core::tabular::RawTile;
use strand_core::{CompileState, StructuralValidator, Theme, TrackRenderer, compile};
use strand_protocol::{Rect, RenderCommand, TileView};

fn tile(json: &str) -> RawTile {
    serde_json::from_str(json).expect("fixture tile parses")
}

fn rects(commands: &[RenderCommand]) -> Vec<Rect> {
    commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawRect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect()
}

#[test]
fn multivec_bars_facet_into_rows() {
    let result = compile(include_str!("fixtures/multivec_peaks.json"), &StructuralValidator);
    assert_eq!(result.state, CompileState::Success, "{}", result.message);
    let compiled = result.compiled.expect("compiled output");
    assert_eq!(compiled.tracks.len(), 1);
    assert!(compiled.tracks[0].valid);
    assert_eq!((compiled.width, compiled.height), (400.0, 130.0));

    let mut renderer = TrackRenderer::new(compiled.tracks[0].clone(), Theme::light());
    let commands = renderer.draw_tile(
        &tile(include_str!("fixtures/multivec_tile.json")),
        &TileView::new(0.0, 4.0, 0.0),
    );

    let bars = rects(&commands);
    assert_eq!(bars.len(), 8);
    // First bin of each sample; the y domain is [0, 10] and each row is 65px.
    assert_eq!(bars[0], Rect::new(0.0, 32.5, 100.0, 32.5));
    assert_eq!(bars[4], Rect::new(0.0, 65.0, 100.0, 65.0));
    assert!(bars[..4].iter().all(|r| r.bottom() <= 65.0));
    assert!(bars[4..].iter().all(|r| r.y >= 65.0));

    assert!(matches!(
        commands.first(),
        Some(RenderCommand::BeginGroup { id, .. }) if id == "peaks"
    ));
    assert!(commands.iter().any(|c| matches!(c, RenderCommand::SetClip { .. })));

    let svg = render_svg(&commands, compiled.width, compiled.height, &Theme::light());
    assert_eq!(svg.matches("<rect").count(), 1 + 1 + 8);
}

#[test]
fn circular_gene_overlay_draws_sectors_arcs_and_labels() {
    let result = compile(include_str!("fixtures/circular_genes.json"), &StructuralValidator);
    assert_eq!(result.state, CompileState::Success, "{}", result.message);
    let compiled = result.compiled.expect("compiled output");
    assert_eq!(compiled.tracks.len(), 3);

    let rings: Vec<_> = compiled
        .tracks
        .iter()
        .map(|t| t.geometry.circular.expect("circular geometry"))
        .collect();
    assert!(rings.iter().all(|r| *r == rings[0]));
    assert_eq!((rings[0].inner_radius, rings[0].outer_radius), (100.0, 200.0));

    let view = TileView::new(0.0, 3000.0, 0.0);
    let genes = include_str!("fixtures/genes_tile.json");
    let mut drawn = Vec::new();
    for resolved in &compiled.tracks {
        let mut renderer = TrackRenderer::new(resolved.clone(), Theme::light());
        drawn.push(renderer.draw_tile(&tile(genes), &view));
    }

    let count = |commands: &[RenderCommand], f: fn(&RenderCommand) -> bool| {
        commands.iter().filter(|c| f(c)).count()
    };
    assert_eq!(count(&drawn[0], |c| matches!(c, RenderCommand::DrawPolygon { .. })), 2);
    assert_eq!(count(&drawn[1], |c| matches!(c, RenderCommand::DrawPolyline { .. })), 1);
    let label = drawn[2].iter().find_map(|c| match c {
        RenderCommand::DrawText { text, rotation, .. } => Some((text.clone(), *rotation)),
        _ => None,
    });
    let (text, rotation) = label.expect("gene label");
    assert_eq!(text, "GENE1");
    assert!((rotation - std::f64::consts::PI).abs() < 1e-9);

    for commands in &drawn {
        assert!(!commands.iter().any(|c| matches!(c, RenderCommand::SetClip { .. })));
    }
}

#[test]
fn fixtures_normalize_idempotently() {
    for json in [
        include_str!("fixtures/multivec_peaks.json"),
        include_str!("fixtures/circular_genes.json"),
    ] {
        let once = normalize(&strand_core::spec::parse_spec(json).expect("spec parses"))
            .expect("normalizes");
        let twice = normalize(&once).expect("normalizes again");
        assert_eq!(once, twice);
    }
}
