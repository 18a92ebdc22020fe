//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - axis-binding scenarios with the default keyword table
//! - motion model construction and resampling properties
//! - parse -> rig -> export -> re-parse round trips
//! - EDR and variable-output conversions
//! - per-file failure isolation in parallel runs

#[cfg(test)]
mod binding_tests {
    use contracts::{BindingRole, BindingWarning, RotationKeywordTable};

    #[test]
    fn test_distinct_helpers_bind_each_axis() {
        let table = RotationKeywordTable::hve_default();
        let report = rigging::infer(["Front_Left_Camber", "Body_Pitch", "Wheel_Yaw"], &table);

        assert_eq!(report.role_of("Front_Left_Camber"), Some(BindingRole::X));
        assert_eq!(report.role_of("Body_Pitch"), Some(BindingRole::Y));
        assert_eq!(report.role_of("Wheel_Yaw"), Some(BindingRole::Z));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_ambiguous_helper_binds_first_axis() {
        let report = rigging::infer(["CamberRotation"], &RotationKeywordTable::hve_default());

        assert_eq!(report.role_of("CamberRotation"), Some(BindingRole::X));
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            report.warnings[0],
            BindingWarning::AmbiguousBinding { .. }
        ));
    }

    #[test]
    fn test_inference_is_repeatable() {
        let table = RotationKeywordTable::hve_default();
        let helpers = ["Steering_Wheel", "Left_Camber", "Right_Camber", "Chassis", "Yaw"];

        let first = rigging::infer(helpers, &table);
        for _ in 0..10 {
            assert_eq!(rigging::infer(helpers, &table), first);
        }
        assert_eq!(first.role_of("Chassis"), Some(BindingRole::Unmapped));
        assert_eq!(first.sources.x.as_deref(), Some("Right_Camber"));
    }

    #[test]
    fn test_custom_keyword_table() {
        let table = RotationKeywordTable::new(
            vec!["roll".into()],
            vec!["tilt".into()],
            vec!["turn".into()],
        );
        let report = rigging::infer(["Body_Tilt", "Front_Camber"], &table);

        assert_eq!(report.role_of("Body_Tilt"), Some(BindingRole::Y));
        assert_eq!(report.role_of("Front_Camber"), Some(BindingRole::Unmapped));
    }
}

#[cfg(test)]
mod model_tests {
    use contracts::{Channel, ParseConfig, TimelineConfig, UnitConfig};
    use ingestion::TabularParser;
    use timeline::ModelBuilder;

    #[test]
    fn test_position_only_table_rests() {
        let set = TabularParser::new(ParseConfig::default())
            .parse_str("time,x,y,z\n0.0,0,0,0\n0.5,1,2,3\n1.0,2,4,6\n", "pos.csv")
            .unwrap();
        assert_eq!(set.len(), 4);
        assert!(set.iter().all(|c| c.len() == 3));

        let samples = ModelBuilder::new(TimelineConfig::default(), UnitConfig::default())
            .build_default(&set)
            .unwrap();
        assert_eq!(samples.len(), 3);
        for sample in &samples {
            assert!(sample.rotation.present_axes().is_empty());
            assert_eq!(sample.rotation.or_rest(), [0.0, 0.0, 0.0]);
        }
        assert_eq!(samples[2].position, [2.0, 4.0, 6.0]);
        assert!(samples.windows(2).all(|w| w[0].frame < w[1].frame));
    }

    #[test]
    fn test_rows_faster_than_frame_rate_all_kept() {
        let set = TabularParser::new(ParseConfig::default())
            .parse_str("time,x\n0,0\n0.01,1\n0.02,2\n0.03,3\n", "dense.csv")
            .unwrap();
        assert_eq!(set.row_count, 4);

        let samples = ModelBuilder::new(TimelineConfig::default(), UnitConfig::default())
            .build_default(&set)
            .unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(
            samples.iter().map(|s| s.position[0]).collect::<Vec<_>>(),
            vec![0.0, 1.0, 2.0, 3.0]
        );
        assert!(samples.windows(2).all(|w| w[0].frame < w[1].frame));
    }

    #[test]
    fn test_resample_interpolates_and_clamps() {
        let channel = Channel::from_pairs("c", [(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert_eq!(timeline::resample(&channel, &[5.0, 20.0]).unwrap(), vec![5.0, 10.0]);
    }

    #[test]
    fn test_resample_at_own_timestamps() {
        let channel =
            Channel::from_pairs("c", [(0.0, 1.5), (0.3, -2.0), (0.7, 4.25), (2.0, 0.0)]).unwrap();
        assert_eq!(
            timeline::resample(&channel, &channel.timestamps()).unwrap(),
            channel.values()
        );
    }
}

#[cfg(test)]
mod round_trip_tests {
    use contracts::{AxisRole, ExportFormat, ParseConfig, PipelineConfig, TimelineConfig, UnitConfig};
    use ingestion::TabularParser;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use timeline::{ModelBuilder, Timing};

    fn relative_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    fn helper_table(rng: &mut StdRng, rows: usize) -> String {
        let mut text = String::from("time,x,y,z,Front_Left_Camber,Body_Pitch,Wheel_Yaw\n");
        for i in 0..rows {
            text.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                i as f64 / 30.0,
                rng.random_range(-50.0..50.0),
                rng.random_range(-50.0..50.0),
                rng.random_range(0.0..2.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-180.0..180.0),
            ));
        }
        text
    }

    #[test]
    fn test_rigged_csv_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = PipelineConfig::default();
        let parser = TabularParser::new(ParseConfig::default());
        let builder = ModelBuilder::new(TimelineConfig::default(), UnitConfig::default());

        let set = parser.parse_str(&helper_table(&mut rng, 24), "rig.csv").unwrap();
        let built = builder
            .build_keyed(&set, Timing::FrameRate(config.timeline.frame_rate))
            .unwrap();
        let mut samples = built.samples;
        let helpers: Vec<String> = set.names();
        let report = rigging::infer(&helpers, &config.keywords);
        assert!(report.sources.missing().is_empty());

        let curves = rigging::reconstruct(
            &samples,
            &built.keys,
            &report.sources,
            &set,
            config.units.angles,
        )
        .unwrap();
        curves.apply(&mut samples).unwrap();

        let bytes = exporters::serialize(&samples, ExportFormat::Csv).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        let reparsed = parser.parse_str(text, "rig_out.csv").unwrap();
        let rebuilt = builder.build_default(&reparsed).unwrap();

        assert_eq!(rebuilt.len(), samples.len());
        for (a, b) in samples.iter().zip(&rebuilt) {
            assert_eq!(a.frame, b.frame);
            assert!(relative_eq(a.time, b.time));
            for i in 0..3 {
                assert!(relative_eq(a.position[i], b.position[i]));
            }
            for axis in AxisRole::ALL {
                let (ra, rb) = (a.rotation.get(axis).unwrap(), b.rotation.get(axis).unwrap());
                assert!(relative_eq(ra, rb), "{axis}: {ra} vs {rb}");
            }
        }
    }

    #[test]
    fn test_h3d_block_per_sample() {
        let set = TabularParser::default()
            .parse_str("frame,x,yaw\n0,0,0\n1,1,90\n2,2,180\n", "h.csv")
            .unwrap();
        let samples = ModelBuilder::default().build_default(&set).unwrap();

        let bytes = exporters::serialize(&samples, ExportFormat::H3d).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with("#Inventor V2.1 ascii\n"));
        assert_eq!(text.matches("#beginTransform").count(), 3);
        assert!(text.contains("DEF Motion_2\n"));
        assert!(text.ends_with("}\n"));
    }
}

#[cfg(test)]
mod conversion_tests {
    use contracts::{EdrConfig, ExportFormat, MotionError, SpeedUnit};
    use rigging::{apply_to_target, KeyframeOptions, RecordingTarget};

    const EDR: &str = "\
Vehicle 1 EDR,,
Time (s),Speed,Yaw Rate
-1.0,10,0
-0.5,10,10
0.0,10,10
";

    const VARIABLE_OUTPUT: &str = "\
,Car 1,Car 1,Car 1,Car 2
Time,KinematicOut:X,KinematicOut:Yaw,WheelsOut:Spin,KinematicOut:X
Time,KinematicOut: X,KinematicOut: Yaw,WheelsOut: Spin,KinematicOut: X
sec,(m),(deg),(rpm),(m)
0.0,0.0,0.0,10,5.0
0.1,1.0,0.5,11,5.5
0.2,2.0,1.0,12,6.0
";

    #[test]
    fn test_edr_path_to_h3d() {
        let table = ingestion::parse_edr_str(EDR, "edr.csv", true).unwrap();
        assert_eq!(table.times(), vec![0.0, 0.5, 1.0]);

        let config = EdrConfig {
            speed_unit: SpeedUnit::Mph,
            ..Default::default()
        };
        let samples = timeline::integrate_path(&table.samples, &config, 30.0).unwrap();
        assert_eq!(samples.first().unwrap().frame, 0);
        assert_eq!(samples.last().unwrap().frame, 30);
        assert!(samples.last().unwrap().position[0] > 0.0);

        let bytes = exporters::serialize(&samples, ExportFormat::H3d).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(text.matches("#beginTransform").count(), samples.len());
        assert!(text.contains("DEF Motion_30\n"));
    }

    #[test]
    fn test_edr_path_keys_scene_with_pre_roll() {
        let table = ingestion::parse_edr_str(EDR, "edr.csv", true).unwrap();
        let samples = timeline::integrate_path(&table.samples, &EdrConfig::default(), 10.0).unwrap();

        let mut target = RecordingTarget::new("Car 1");
        let keyed = apply_to_target(&mut target, &samples, KeyframeOptions::default());
        assert_eq!(keyed, samples.len() + 1);
        assert_eq!(target.frames().first(), Some(&-1));
    }

    #[test]
    fn test_variable_output_to_racerender() {
        let table = ingestion::parse_variable_output_str(VARIABLE_OUTPUT, "run.csv").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let paths = exporters::write_variable_output(&table, dir.path(), "run").unwrap();
        assert_eq!(paths.len(), 2);

        let car1 = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(
            car1,
            "Time (sec),KinematicOut: X (m),KinematicOut: Yaw (deg)\r\n\
             0.0,0.0,0.0\r\n\
             0.1,1.0,0.5\r\n\
             0.2,2.0,1.0\r\n"
        );
    }

    #[test]
    fn test_variable_output_without_kinematics() {
        let text = VARIABLE_OUTPUT.replace("KinematicOut", "DriverOut");
        let err = ingestion::parse_variable_output_str(&text, "run.csv").unwrap_err();
        assert!(matches!(err, MotionError::InvalidArgument { .. }));
    }
}

#[cfg(test)]
mod dispatch_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ParseConfig, TimelineConfig, UnitConfig};
    use exporters::Dispatcher;
    use ingestion::TabularParser;
    use timeline::ModelBuilder;

    #[test]
    fn test_configured_outputs_written() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[timeline]
frame_rate = 10.0

[[outputs]]
name = "generic"
format = "csv"
path = "{dir}"

[[outputs]]
name = "scene"
format = "h3d"
path = "{dir}"
object_name = "Car1"
"#,
            dir = dir.path().display()
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        let set = TabularParser::new(ParseConfig::default())
            .parse_str("time,x,pitch\n0,0,0\n0.1,1,5\n", "run.csv")
            .unwrap();
        let samples = ModelBuilder::new(
            TimelineConfig {
                frame_rate: config.timeline.frame_rate,
                ..Default::default()
            },
            UnitConfig::default(),
        )
        .build_default(&set)
        .unwrap();

        let mut dispatcher = Dispatcher::from_outputs(&config.outputs, "run").unwrap();
        let report = dispatcher.dispatch(&samples);
        dispatcher.shutdown();

        assert!(report.is_success());
        assert!(dir.path().join("run_generic.csv").is_file());
        let h3d = std::fs::read_to_string(dir.path().join("run_scene.h3d")).unwrap();
        assert!(h3d.contains("DEF Car1_1\n"));
    }
}

#[cfg(test)]
mod batch_tests {
    use contracts::{MotionError, ParseConfig};
    use ingestion::TabularParser;
    use observability::{FileOutcome, PipelineMetricsAggregator};
    use timeline::ModelBuilder;
    use tokio::task::JoinSet;

    fn convert(name: &str, text: &str) -> Result<usize, MotionError> {
        let set = TabularParser::new(ParseConfig::default()).parse_str(text, name)?;
        let samples = ModelBuilder::default().build_default(&set)?;
        Ok(samples.len())
    }

    #[tokio::test]
    async fn test_failed_files_do_not_stop_others() {
        let inputs = [
            ("ok_1.csv", "time,x\n0,0\n1,1\n"),
            ("malformed.csv", "time,x\n0,0\n1,1,9\n"),
            ("no_timebase.csv", "x,y\n0,0\n"),
            ("ok_2.csv", "frame,yaw\n0,0\n1,10\n2,20\n"),
        ];

        let mut tasks = JoinSet::new();
        for (name, text) in inputs {
            tasks.spawn_blocking(move || match convert(name, text) {
                Ok(samples) => FileOutcome {
                    source: name.to_string(),
                    samples,
                    ..Default::default()
                },
                Err(e) => {
                    assert!(e.is_per_file(), "{e}");
                    FileOutcome {
                        source: name.to_string(),
                        error: Some(e.to_string()),
                        ..Default::default()
                    }
                }
            });
        }

        let mut aggregator = PipelineMetricsAggregator::new();
        while let Some(outcome) = tasks.join_next().await {
            aggregator.update(&outcome.unwrap());
        }

        assert_eq!(aggregator.total_files, 4);
        assert_eq!(aggregator.failed_files, 2);
        assert_eq!(aggregator.total_samples, 5);
        let mut failed: Vec<&str> = aggregator.failures.iter().map(|(s, _)| s.as_str()).collect();
        failed.sort();
        assert_eq!(failed, vec!["malformed.csv", "no_timebase.csv"]);
    }
}

#[cfg(test)]
mod metrics_tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use contracts::RotationKeywordTable;
    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };

    /// Counts increments of one counter, ignores everything else
    struct CountingRecorder {
        name: &'static str,
        total: Arc<AtomicU64>,
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            if key.name() == self.name {
                Counter::from_arc(self.total.clone())
            } else {
                Counter::noop()
            }
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_binding_warnings_counted_once() {
        let recorder = CountingRecorder {
            name: "hve_motion_binding_warnings_total",
            total: Arc::new(AtomicU64::new(0)),
        };

        let warnings = metrics::with_local_recorder(&recorder, || {
            let report = rigging::infer(
                ["CamberRotation", "Left_Yaw", "Right_Yaw"],
                &RotationKeywordTable::hve_default(),
            );
            observability::record_binding_warnings(&report.warnings);
            report.warnings.len()
        });

        assert_eq!(warnings, 2);
        assert_eq!(recorder.total.load(Ordering::Relaxed), 2);
    }
}
