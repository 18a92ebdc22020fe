//! Generic motion CSV

use bytes::Bytes;
use contracts::{AxisRole, MotionSample, RecordLayout};

use super::{finish_csv, fmt_optional, fmt_value};
use crate::error::ExportError;

fn rotation_header(axis: AxisRole) -> &'static str {
    match axis {
        AxisRole::X => "rot_x (rad)",
        AxisRole::Y => "rot_y (rad)",
        AxisRole::Z => "rot_z (rad)",
    }
}

pub(super) fn encode(samples: &[MotionSample]) -> Result<Bytes, ExportError> {
    let layout = RecordLayout::from_samples(samples);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = vec!["frame", "time (s)", "x (m)", "y (m)", "z (m)"];
    header.extend(layout.rotation_axes.iter().map(|a| rotation_header(*a)));
    header.extend(layout.extra_columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in layout.records(samples) {
        let mut row = vec![record.frame.to_string(), fmt_value(record.time)];
        row.extend(record.position.iter().map(|v| fmt_value(*v)));
        row.extend(
            layout
                .rotation_axes
                .iter()
                .map(|a| fmt_optional(record.orientation.get(*a))),
        );
        row.extend(record.extras.iter().map(|(_, v)| fmt_optional(*v)));
        writer.write_record(&row)?;
    }

    finish_csv(writer, "csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ExportFormat, ParseConfig, TimelineConfig, UnitConfig};
    use ingestion::TabularParser;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use timeline::ModelBuilder;

    fn sample(frame: i64, x: f64, yaw: Option<f64>) -> MotionSample {
        let mut sample = MotionSample::new(frame, frame as f64 / 30.0);
        sample.position = [x, -x, 0.5];
        sample.rotation.set(AxisRole::Z, yaw);
        sample
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1e-12)
    }

    #[test]
    fn test_layout() {
        let mut first = sample(0, 1.0, Some(0.25));
        first.channels.insert("speed".into(), 3.0);
        let samples = vec![first, sample(1, 2.0, Some(0.5))];

        let bytes = encode(&samples).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frame,time (s),x (m),y (m),z (m),rot_z (rad),speed");
        assert_eq!(lines[1], "0,0.0,1.0,-1.0,0.5,0.25,3.0");
        assert_eq!(lines[2], "1,0.03333333333333333,2.0,-2.0,0.5,0.5,");
    }

    #[test]
    fn test_round_trip_through_parser() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<MotionSample> = (0..50)
            .map(|i| {
                let mut s = MotionSample::new(i * 2, i as f64 * 0.0667 - 1.0);
                s.position = [
                    rng.random_range(-1e3..1e3),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(0.0..1e-3),
                ];
                s.rotation.set(AxisRole::X, Some(rng.random_range(-3.0..3.0)));
                s.rotation.set(AxisRole::Z, Some(rng.random_range(-3.0..3.0)));
                s.channels.insert("brake".into(), rng.random_range(0.0..1.0));
                s
            })
            .collect();

        let bytes = serialize_csv(&samples);
        let set = TabularParser::new(ParseConfig::default())
            .parse_str(std::str::from_utf8(&bytes).unwrap(), "round_trip.csv")
            .unwrap();
        let rebuilt = ModelBuilder::new(TimelineConfig::default(), UnitConfig::default())
            .build_default(&set)
            .unwrap();

        assert_eq!(rebuilt.len(), samples.len());
        for (a, b) in samples.iter().zip(&rebuilt) {
            assert_eq!(a.frame, b.frame);
            assert!(close(a.time, b.time));
            for k in 0..3 {
                assert!(close(a.position[k], b.position[k]));
            }
            assert_eq!(b.rotation.y, None);
            assert!(close(a.rotation.x.unwrap(), b.rotation.x.unwrap()));
            assert!(close(a.rotation.z.unwrap(), b.rotation.z.unwrap()));
            assert!(close(a.channels["brake"], b.channels["brake"]));
        }
    }

    fn serialize_csv(samples: &[MotionSample]) -> Bytes {
        crate::serialize(samples, ExportFormat::Csv).unwrap()
    }
}
