use std::fs;
use std::path::Path;

use planlog_viz::figure::{Marker, Role, Series, ENDPOINT_SIZE, OBSTACLE_SIZE};
use planlog_viz::{load_run, visualize, Figure, FigureSink, VizError};
use tempfile::tempdir;

#[derive(Default)]
struct RecordingSink {
    shown: Vec<Figure>,
}

impl FigureSink for RecordingSink {
    fn show(&mut self, figure: &Figure) -> Result<(), VizError> {
        self.shown.push(figure.clone());
        Ok(())
    }
}

fn write_run(base: &Path, name: &str, request: &str, response: &str) {
    let dir = base.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("request.json"), request).unwrap();
    fs::write(dir.join("response.json"), response).unwrap();
}

#[test]
fn failed_plan_titles_error_and_draws_no_path() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r1",
        r#"{"sx":0,"sy":0,"gx":5,"gy":5,"ox":[1,2],"oy":[3,4]}"#,
        r#"{"ok":false,"error":"no path"}"#,
    );

    let mut sink = RecordingSink::default();
    let dir = visualize(base.path(), Some("r1"), &mut sink).unwrap();
    assert_eq!(dir, base.path().join("r1"));
    assert_eq!(sink.shown.len(), 1);

    let fig = &sink.shown[0];
    assert!(fig.title.contains("ok=false"), "{}", fig.title);
    assert!(fig.title.contains("no path"), "{}", fig.title);
    assert_eq!(fig.lines().count(), 0);

    match fig.find(Role::Obstacles) {
        Some(Series::Scatter { points, size, filled, .. }) => {
            assert_eq!(points, &vec![(1.0, 3.0), (2.0, 4.0)]);
            assert_eq!(*size, OBSTACLE_SIZE);
            assert!(!filled);
        }
        other => panic!("unexpected obstacle series: {other:?}"),
    }
}

#[test]
fn successful_plan_draws_line_and_reports_cost() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r2",
        r#"{"sx":0,"sy":0,"gx":2,"gy":1}"#,
        r#"{"ok":true,"x":[0,1,2],"y":[0,1,1],"cost":2.0}"#,
    );

    let mut sink = RecordingSink::default();
    visualize(base.path(), Some("r2"), &mut sink).unwrap();
    let fig = &sink.shown[0];

    assert!(fig.title.contains("n=3"), "{}", fig.title);
    assert!(fig.title.contains("cost=2.0"), "{}", fig.title);
    let lines: Vec<&Series> = fig.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points(), vec![(0.0, 0.0), (1.0, 1.0), (2.0, 1.0)]);
    // no obstacles were logged
    assert!(fig.find(Role::Obstacles).is_none());
    assert!(fig.equal_aspect && fig.grid);
    assert_eq!((fig.x_label.as_str(), fig.y_label.as_str()), ("x", "y"));
}

#[test]
fn start_and_goal_are_always_drawn() {
    for response in [r#"{"ok":true,"x":[1,9],"y":[2,8],"cost":1.5}"#, r#"{"ok":false}"#] {
        let base = tempdir().unwrap();
        write_run(base.path(), "r", r#"{"sx":1,"sy":2,"gx":9,"gy":8}"#, response);
        let log = load_run(&base.path().join("r")).unwrap();
        let fig = planlog_viz::build_figure(&log);

        match fig.find(Role::Start) {
            Some(Series::Scatter { points, size, marker, .. }) => {
                assert_eq!(points, &vec![(1.0, 2.0)]);
                assert_eq!(*size, ENDPOINT_SIZE);
                assert_eq!(*marker, Marker::Circle);
            }
            other => panic!("unexpected start series: {other:?}"),
        }
        match fig.find(Role::Goal) {
            Some(Series::Scatter { points, size, marker, .. }) => {
                assert_eq!(points, &vec![(9.0, 8.0)]);
                assert_eq!(*size, ENDPOINT_SIZE);
                assert_eq!(*marker, Marker::Cross);
            }
            other => panic!("unexpected goal series: {other:?}"),
        }
    }
}

#[test]
fn missing_request_fails_before_rendering() {
    let base = tempdir().unwrap();
    let dir = base.path().join("r");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("response.json"), r#"{"ok":false}"#).unwrap();

    let mut sink = RecordingSink::default();
    let err = visualize(base.path(), Some("r"), &mut sink).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("request.json"));
    assert!(sink.shown.is_empty());
}

#[test]
fn no_runs_fails_before_rendering() {
    let base = tempdir().unwrap();
    let mut sink = RecordingSink::default();
    let err = visualize(base.path(), None, &mut sink).unwrap_err();
    assert!(matches!(err, VizError::NoRuns { .. }));
    assert!(sink.shown.is_empty());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let base = tempdir().unwrap();
    write_run(base.path(), "r", r#"{"sx":0,"sy":0,"gx":1,"gy":1}"#, "{ok: nope");
    let mut sink = RecordingSink::default();
    let err = visualize(base.path(), Some("r"), &mut sink).unwrap_err();
    assert!(matches!(err, VizError::Parse { .. }));
    assert!(sink.shown.is_empty());
}

#[test]
fn missing_goal_is_a_parse_error() {
    let base = tempdir().unwrap();
    write_run(base.path(), "r", r#"{"sx":0,"sy":0}"#, r#"{"ok":false}"#);
    let err = load_run(&base.path().join("r")).unwrap_err();
    assert!(matches!(err, VizError::Parse { .. }));
}

#[test]
fn uneven_obstacles_and_null_cost_do_not_crash() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r",
        r#"{"sx":0,"sy":0,"gx":1,"gy":1,"ox":[1,2,3],"oy":[4]}"#,
        r#"{"ok":true,"x":[0,1],"y":[0,1],"cost":null}"#,
    );
    let log = load_run(&base.path().join("r")).unwrap();
    let fig = planlog_viz::build_figure(&log);
    assert_eq!(fig.find(Role::Obstacles).unwrap().points(), vec![(1.0, 4.0)]);
    assert!(fig.title.ends_with("cost=none"), "{}", fig.title);
}

#[test]
fn headings_follow_logged_yaw() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r",
        r#"{"sx":0,"sy":0,"syaw":1.57,"gx":4,"gy":4,"xyreso":2.0,"extra":"ignored"}"#,
        r#"{"ok":false,"error":"timeout","direction":[1,-1]}"#,
    );
    let log = load_run(&base.path().join("r")).unwrap();
    let fig = planlog_viz::build_figure(&log);
    let headings: Vec<&Series> = fig.series.iter().filter(|s| matches!(s, Series::Heading { .. })).collect();
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].role(), Role::Start);
}

#[test]
fn goal_heading_uses_gyaw() {
    let base = tempdir().unwrap();
    write_run(base.path(), "r", r#"{"sx":0,"sy":0,"gx":4,"gy":4,"gyaw":-1.0}"#, r#"{"ok":false}"#);
    let fig = planlog_viz::build_figure(&load_run(&base.path().join("r")).unwrap());
    match fig.series.iter().find(|s| matches!(s, Series::Heading { .. })) {
        Some(Series::Heading { role, origin, yaw }) => {
            assert_eq!(*role, Role::Goal);
            assert_eq!(*origin, (4.0, 4.0));
            assert_eq!(*yaw, -1.0);
        }
        other => panic!("unexpected heading series: {other:?}"),
    }
}

#[test]
fn null_arrays_read_as_no_data() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r",
        r#"{"sx":0,"sy":0,"gx":1,"gy":1,"ox":null,"oy":null,"syaw":null}"#,
        r#"{"ok":false,"x":null,"y":null,"cost":null,"error":"no path"}"#,
    );
    let mut sink = RecordingSink::default();
    visualize(base.path(), Some("r"), &mut sink).unwrap();
    let fig = &sink.shown[0];
    assert!(fig.find(Role::Obstacles).is_none());
    assert_eq!(fig.lines().count(), 0);
    assert!(fig.series.iter().all(|s| !matches!(s, Series::Heading { .. })));
    assert_eq!(fig.title, "Path ok=false, error=no path");
}

#[test]
fn unread_fields_of_any_shape_are_ignored() {
    let responses = [
        r#"{"ok":true,"x":[0,1],"y":[0,1],"cost":1.0,"direction":[true,false]}"#,
        r#"{"ok":true,"x":[0,1],"y":[0,1],"cost":1.0,"length":2.5}"#,
        r#"{"ok":false,"error":"no path","length":null,"yaw":null,"yaw1":"n/a"}"#,
    ];
    for response in responses {
        let base = tempdir().unwrap();
        write_run(
            base.path(),
            "r",
            r#"{"sx":0,"sy":0,"gx":1,"gy":1,"styaw":null,"gtyaw":"x","xyreso":[2],"yawreso":null}"#,
            response,
        );
        let mut sink = RecordingSink::default();
        visualize(base.path(), Some("r"), &mut sink).unwrap_or_else(|e| panic!("{response}: {e}"));
        assert_eq!(sink.shown.len(), 1);
    }
}

#[test]
fn mistyped_optional_values_degrade_to_defaults() {
    let base = tempdir().unwrap();
    write_run(
        base.path(),
        "r",
        r#"{"sx":0,"sy":0,"gx":1,"gy":1,"ox":"none","oy":[1],"gyaw":"east"}"#,
        r#"{"ok":true,"x":[0,"a",1],"y":[0,1],"cost":"cheap"}"#,
    );
    let fig = planlog_viz::build_figure(&load_run(&base.path().join("r")).unwrap());
    assert!(fig.find(Role::Obstacles).is_none());
    assert!(fig.series.iter().all(|s| !matches!(s, Series::Heading { .. })));
    assert_eq!(fig.lines().next().unwrap().points(), vec![(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(fig.title, "Path ok=true, n=2, cost=none");
}
