//! Axis Inference Engine
//!
//! Binds helper object names to rotation axes by case-insensitive keyword
//! substrings. Priority order is X, Y, Z.
//!
//! Tie-breaking:
//! - a name matching several axes binds to the first of them (`AmbiguousBinding`)
//! - a later helper matching an already sourced axis becomes that axis' source
//!   (`DuplicateBinding`); the earlier helper keeps its binding entry

use std::collections::HashSet;

use contracts::{
    AxisRole, AxisSources, BindingRole, BindingWarning, HelperBinding, InferenceReport,
    RotationKeywordTable,
};
use tracing::{debug, instrument};

const TRAILING_TOKENS: [&str; 8] = [
    "object", "objects", "wheel", "wheels", "tire", "tires", "geometry", "steering",
];

/// Axes whose keyword set matches `helper`, in priority order
pub fn matching_axes(helper: &str, table: &RotationKeywordTable) -> Vec<AxisRole> {
    let name = helper.to_lowercase();
    AxisRole::ALL
        .into_iter()
        .filter(|axis| {
            table
                .keywords(*axis)
                .iter()
                .any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
        })
        .collect()
}

/// Bind every helper name to an axis role
///
/// Deterministic for a given input order and table. Repeated names are bound once.
#[instrument(name = "axis_infer", skip_all)]
pub fn infer<I, S>(helpers: I, table: &RotationKeywordTable) -> InferenceReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = InferenceReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for helper in helpers {
        let helper = helper.as_ref();
        if !seen.insert(helper.to_string()) {
            debug!(helper, "ignored repeated helper name");
            continue;
        }

        let matched = matching_axes(helper, table);
        let Some(&assigned) = matched.first() else {
            debug!(helper, "helper matches no axis keyword");
            report.bindings.push(HelperBinding {
                helper: helper.to_string(),
                role: BindingRole::Unmapped,
            });
            continue;
        };

        if matched.len() > 1 {
            report.warnings.push(BindingWarning::AmbiguousBinding {
                helper: helper.to_string(),
                matched: matched.clone(),
                assigned,
            });
        }
        if let Some(previous) = report.sources.replace(assigned, helper.to_string()) {
            report.warnings.push(BindingWarning::DuplicateBinding {
                axis: assigned,
                previous,
                replacement: helper.to_string(),
            });
        }

        debug!(helper, axis = %assigned, "bound helper");
        report.bindings.push(HelperBinding {
            helper: helper.to_string(),
            role: assigned.into(),
        });
    }

    report
}

/// Strip a trailing `.NNN` duplicate suffix
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos)
            if pos + 1 < name.len() && name[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &name[..pos]
        }
        _ => name,
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Base vehicle identifier: numeric suffix and colon path removed
///
/// `"Car 1.002"` -> `"Car 1"`, `"Truck:Body"` -> `"Truck"`
pub fn normalize_root_name(name: &str) -> &str {
    let name = strip_numeric_suffix(name);
    name.split(':').next().unwrap_or(name)
}

/// Whether `object_name` appears to belong to `vehicle`
///
/// The vehicle's tokens must occur consecutively inside one colon segment of the
/// object name, followed only by digits or generic part words (wheel, tire, ...).
pub fn belongs_to_vehicle(object_name: &str, vehicle: &str) -> bool {
    let wanted = tokens(vehicle);
    if wanted.is_empty() {
        return false;
    }

    object_name.split(':').any(|segment| {
        let segment = tokens(strip_numeric_suffix(segment));
        segment
            .windows(wanted.len())
            .enumerate()
            .filter(|(_, window)| *window == wanted.as_slice())
            .any(|(i, _)| {
                segment[i + wanted.len()..].iter().all(|t| {
                    t.chars().all(|c| c.is_ascii_digit()) || TRAILING_TOKENS.contains(&t.as_str())
                })
            })
    })
}

/// Axis sources for the helpers of one vehicle
pub fn vehicle_sources<'a, I>(helpers: I, vehicle: &str, table: &RotationKeywordTable) -> AxisSources
where
    I: IntoIterator<Item = &'a str>,
{
    let own = helpers
        .into_iter()
        .filter(|name| belongs_to_vehicle(name, vehicle));
    infer(own, table).sources
}
