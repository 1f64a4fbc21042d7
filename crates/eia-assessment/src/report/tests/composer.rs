use super::common::*;
use crate::assessment::domain::IndicatorSet;
use crate::assessment::recommendations::NO_SIGNIFICANT_RISK;
use crate::chart::ChartSnapshot;
use crate::report::{OutputName, ReportError, ReportOutcome};

fn indicators() -> IndicatorSet {
    IndicatorSet::new(72, 55, 30, 10, 51).expect("valid indicators")
}

#[test]
fn sections_render_in_fixed_order() {
    let fixture = Fixture::new(indicators());
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    let lines = texts(&log);
    let position = |needle: &str| {
        lines
            .iter()
            .position(|line| line == needle)
            .unwrap_or_else(|| panic!("missing line {needle:?}"))
    };

    let order = [
        position("Environmental Impact Assessment Report"),
        position("Project Details"),
        position("Project Name: Riverside Culvert Upgrade"),
        position("Site Information"),
        position("Soil Types: N/A"),
        position("Activities"),
        position("[X] Vegetation clearing"),
        position("[ ] Instream works"),
        position("Risk Assessment"),
        position("Risk Score: 48"),
        position("Risk Level: Moderate Risk"),
        position("Recommendations"),
        position("- Implement erosion control measures such as sediment traps."),
        position("- Reduce emissions and control dust in sensitive areas."),
    ];
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{order:?}");

    let calls = log.borrow();
    let image = calls
        .iter()
        .position(|call| matches!(call, Call::Image { .. }))
        .expect("chart placed");
    let recommendations_heading = calls
        .iter()
        .position(|call| matches!(call, Call::Text { text, .. } if text == "Recommendations"))
        .expect("heading present");
    assert!(image < recommendations_heading);
    assert!(calls.iter().any(|call| matches!(call, Call::Rule { .. })));
}

#[test]
fn missing_chart_is_omitted_and_composition_continues() {
    let fixture = Fixture::new(indicators()).without_chart();
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    let pages = composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    assert_eq!(pages, 1);
    assert!(!log
        .borrow()
        .iter()
        .any(|call| matches!(call, Call::Image { .. })));
    assert!(texts(&log).iter().any(|line| line.starts_with("- ")));
}

#[test]
fn quiet_assessment_prints_sentinel_without_bullet() {
    let fixture = Fixture::new(IndicatorSet::uniform(40).expect("valid"));
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    let lines = texts(&log);
    assert!(lines.iter().any(|line| line == NO_SIGNIFICANT_RISK));
    assert!(lines.iter().any(|line| line == "Risk Level: Moderate Risk"));
    assert!(!lines.iter().any(|line| line.starts_with("- ")));
}

#[test]
fn empty_activity_list_skips_the_section() {
    let mut fixture = Fixture::new(indicators());
    fixture.activities.clear();
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    assert!(!texts(&log).iter().any(|line| line == "Activities"));
}

#[test]
fn long_content_paginates_and_every_page_gets_a_trailing_footer() {
    let mut fixture = Fixture::new(indicators());
    fixture.metadata.project_description = "sediment ".repeat(900);
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    let total = composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");
    assert!(total >= 3, "expected several pages, got {total}");

    let calls = log.borrow();
    let footers: Vec<(usize, usize, &str)> = calls
        .iter()
        .enumerate()
        .filter_map(|(index, call)| match call {
            Call::Text { page, text, .. } if text.starts_with("EIA Field Tool - Page") => {
                Some((index, *page, text.as_str()))
            }
            _ => None,
        })
        .collect();

    assert_eq!(footers.len(), total);
    for (number, (_, page, text)) in footers.iter().enumerate() {
        assert_eq!(*page, number + 1);
        assert_eq!(*text, format!("EIA Field Tool - Page {} of {}", number + 1, total));
    }

    let first_footer = footers[0].0;
    let last_content = calls
        .iter()
        .rposition(|call| match call {
            Call::Text { text, .. } => !text.starts_with("EIA Field Tool - Page"),
            Call::Image { .. } | Call::Rule { .. } | Call::NewPage => true,
            Call::SetPage(_) => false,
        })
        .expect("content present");
    assert!(last_content < first_footer);
}

#[test]
fn content_stays_inside_the_bottom_limit_and_images_never_split() {
    let mut fixture = Fixture::new(indicators());
    fixture.metadata.flora_fauna = "platypus burrows along the eastern bank ".repeat(120);
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    for call in log.borrow().iter() {
        match call {
            Call::Image { y, height, .. } => assert!(y + height <= 270.0 + f32::EPSILON),
            Call::Text { text, y, .. } if !text.starts_with("EIA Field Tool") => {
                assert!(*y <= 270.0, "{text} drawn at {y}")
            }
            _ => {}
        }
    }
}

#[test]
fn footer_baseline_follows_the_canvas_page_height() {
    let fixture = Fixture::new(indicators()).without_chart();
    for (page_height, expected) in [(297.0, 287.0), (280.0, 270.0)] {
        let log = CallLog::default();
        let mut canvas = RecordingCanvas::new(log.clone()).with_page_height(page_height);

        composer()
            .compose(&mut canvas, &fixture.input())
            .expect("composes");

        let baselines: Vec<f32> = log
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Text { text, y, .. } if text.starts_with("EIA Field Tool - Page") => Some(*y),
                _ => None,
            })
            .collect();
        assert!(!baselines.is_empty());
        assert!(baselines.iter().all(|y| *y == expected), "{baselines:?}");
    }
}

#[test]
fn tall_chart_is_scaled_down_to_one_page() {
    let chart = ChartSnapshot::new(20, 40, vec![255; 20 * 40 * 4]).expect("snapshot");
    let fixture = Fixture::new(indicators()).with_chart(chart);
    let log = CallLog::default();
    let mut canvas = RecordingCanvas::new(log.clone());

    composer()
        .compose(&mut canvas, &fixture.input())
        .expect("composes");

    let images: Vec<(f32, f32, f32)> = log
        .borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Image {
                y, width, height, ..
            } => Some((*y, *width, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(images.len(), 1);

    let (y, width, height) = images[0];
    assert!((height - 260.0).abs() < 1e-3, "height {height}");
    assert!((width - 130.0).abs() < 1e-3, "width {width}");
    assert!(y + height <= 270.0 + 1e-3, "image bottom at {}", y + height);
}

#[test]
fn cancelled_or_blank_name_touches_nothing() {
    let fixture = Fixture::new(indicators());
    let dir = tempfile::tempdir().expect("temp dir");
    let composer = composer();

    for name in [
        OutputName::Cancelled,
        OutputName::Named(String::new()),
        OutputName::Named("   ".to_string()),
        OutputName::Named(".pdf".to_string()),
    ] {
        let log = CallLog::default();
        let outcome = composer
            .generate(name, &fixture.input(), dir.path(), |_| {
                RecordingCanvas::new(log.clone())
            })
            .expect("cancellation is not an error");
        assert_eq!(outcome, ReportOutcome::Cancelled);
        assert!(log.borrow().is_empty());
    }

    let entries = std::fs::read_dir(dir.path()).expect("readable").count();
    assert_eq!(entries, 0);
}

#[test]
fn successful_run_saves_under_chosen_name() {
    let fixture = Fixture::new(indicators()).without_chart();
    let dir = tempfile::tempdir().expect("temp dir");

    let outcome = composer()
        .generate(
            OutputName::Named("Culvert.PDF".to_string()),
            &fixture.input(),
            dir.path(),
            |_| RecordingCanvas::new(CallLog::default()),
        )
        .expect("generates");

    let expected = dir.path().join("Culvert.pdf");
    assert_eq!(
        outcome,
        ReportOutcome::Saved {
            path: expected.clone(),
            pages: 1
        }
    );
    assert_eq!(std::fs::read(&expected).expect("saved"), b"1 pages".to_vec());
    assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 1);
}

#[test]
fn canvas_fault_aborts_without_persisting() {
    let fixture = Fixture::new(indicators());
    let dir = tempfile::tempdir().expect("temp dir");

    let result = composer().generate(
        OutputName::Named("broken".to_string()),
        &fixture.input(),
        dir.path(),
        |_| RecordingCanvas::failing_on(CallLog::default(), "Risk Score"),
    );

    assert!(matches!(result, Err(ReportError::Composition(_))));
    assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 0);
}

#[test]
fn reentrant_trigger_is_ignored_while_a_run_is_active() {
    let fixture = Fixture::new(indicators());
    let dir = tempfile::tempdir().expect("temp dir");
    let composer = composer();
    let nested = std::cell::RefCell::new(None);

    let outcome = composer
        .generate(
            OutputName::Named("outer".to_string()),
            &fixture.input(),
            dir.path(),
            |_| {
                let inner = composer.generate(
                    OutputName::Named("inner".to_string()),
                    &fixture.input(),
                    dir.path(),
                    |_| RecordingCanvas::new(CallLog::default()),
                );
                *nested.borrow_mut() = Some(inner.expect("busy is not an error"));
                RecordingCanvas::new(CallLog::default())
            },
        )
        .expect("outer run completes");

    assert!(matches!(outcome, ReportOutcome::Saved { .. }));
    assert_eq!(nested.into_inner(), Some(ReportOutcome::Busy));
    assert!(!dir.path().join("inner.pdf").exists());

    let again = composer
        .generate(
            OutputName::Named("again".to_string()),
            &fixture.input(),
            dir.path(),
            |_| RecordingCanvas::new(CallLog::default()),
        )
        .expect("guard released");
    assert!(matches!(again, ReportOutcome::Saved { .. }));
}
