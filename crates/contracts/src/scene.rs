//! KeyframeTarget trait - host scene seam
//!
//! The host scene owns objects and their animation data. The pipeline only writes
//! keys through this trait.

/// An animatable object in the host scene
pub trait KeyframeTarget {
    /// Object name (used for logging)
    fn object_name(&self) -> &str;

    /// Whether any animation data exists
    fn has_animation(&self) -> bool;

    /// Remove all existing animation data
    fn clear_animation(&mut self);

    /// Whether a location or rotation key exists at `frame`
    fn has_key_at(&self, frame: i64) -> bool;

    /// Insert (or overwrite) a location key, metres
    fn insert_location_key(&mut self, frame: i64, location: [f64; 3]);

    /// Insert (or overwrite) an XYZ Euler rotation key, radians
    fn insert_rotation_key(&mut self, frame: i64, rotation: [f64; 3]);
}
