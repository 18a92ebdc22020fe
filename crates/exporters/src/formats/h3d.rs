//! H3D motion block (Inventor V2.1 ascii)
//!
//! One `Transform` per sample, named `DEF <object>_<frame>`. The byte layout is
//! pinned: global transform header, `%.6f` translation/scale/axis and `%.16f`
//! angle, closing brace footer.

use std::fmt::Write as _;

use bytes::Bytes;
use contracts::MotionSample;
use rigging::euler_to_axis_angle;

const HEADER: &str = "#Inventor V2.1 ascii\n\n  Info {\n}\nSeparator\n{\n\
Transform { #beginGlobalTransform\n\
translation 0.000000 0.000000 0.000000\n\
scaleFactor 1.000000 1.000000 1.000000\n\
rotation 0.000000 1.000000 0.000000 0.000000\n\
} #endGlobalTransform\n";

const FOOTER: &str = "}\n";

const IDENT: &str = "    ";
const IDENT_STEP: &str = "              ";

/// Make a name safe for `DEF`
///
/// Control characters and `space " ' # , . [ ] \ { }` become `_`; a leading digit
/// or sign gets a `_` prefix; an empty name becomes `None`.
pub fn clean_def(name: &str) -> String {
    if name.is_empty() {
        return "None".to_string();
    }
    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '-') {
        out.push('_');
    }
    out.extend(name.chars().map(|c| match c {
        '\u{01}'..='\u{20}' | '\u{7f}' | '"' | '\'' | '#' | ',' | '.' | '[' | ']' | '\\' | '{'
        | '}' => '_',
        other => other,
    }));
    out
}

/// Frame label usable inside a DEF name (`-1` -> `n1`)
fn frame_label(frame: i64) -> String {
    if frame < 0 {
        format!("n{}", frame.unsigned_abs())
    } else {
        frame.to_string()
    }
}

pub(super) fn encode(samples: &[MotionSample], object_name: &str) -> Bytes {
    let mut out = String::from(HEADER);
    for sample in samples {
        let def_id = clean_def(&format!("{object_name}_{}", frame_label(sample.frame)));
        let [x, y, z] = sample.position;
        let rotation = euler_to_axis_angle(sample.rotation.or_rest());
        let [ax, ay, az] = rotation.axis;

        // Writing into a String cannot fail
        let _ = write!(
            out,
            "{IDENT}# {def_id}\n\
             {IDENT}DEF {def_id}\n\
             {IDENT}Transform {{ #beginTransform\n\
             {IDENT_STEP}translation {x:.6} {y:.6} {z:.6}\n\
             {IDENT_STEP}scaleFactor 1.000000 1.000000 1.000000\n\
             {IDENT_STEP}rotation {ax:.6} {ay:.6} {az:.6} {angle:.16}\n\
             {IDENT_STEP}}} #endTransform\n\
             {IDENT}\n",
            angle = rotation.angle,
        );
    }
    out.push_str(FOOTER);
    Bytes::from(out)
}
