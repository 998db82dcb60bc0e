use crate::foundation::error::{RouteReelError, RouteReelResult};

/// Predicted pace profile: parallel arrays of cumulative distance, speed and optional elevation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaceSamples {
    /// Cumulative distance in miles, non-decreasing.
    pub distance_mi: Vec<f64>,
    /// Instantaneous speed in miles per hour.
    pub speed_mph: Vec<f64>,
    /// Optional elevation in feet, co-indexed with `distance_mi`.
    pub elevation_ft: Option<Vec<f64>>,
}

impl PaceSamples {
    /// Build and validate a pace profile.
    pub fn new(
        distance_mi: Vec<f64>,
        speed_mph: Vec<f64>,
        elevation_ft: Option<Vec<f64>>,
    ) -> RouteReelResult<Self> {
        let s = Self {
            distance_mi,
            speed_mph,
            elevation_ft,
        };
        s.validate()?;
        Ok(s)
    }

    /// Reject under-length, mismatched or non-monotone input before any rendering begins.
    pub fn validate(&self) -> RouteReelResult<()> {
        let n = self.distance_mi.len();
        if n != self.speed_mph.len() {
            return Err(RouteReelError::validation(format!(
                "distance_mi and speed_mph must be the same length (got {} and {})",
                n,
                self.speed_mph.len()
            )));
        }
        if n < 2 {
            return Err(RouteReelError::validation(format!(
                "pace profile needs at least 2 samples, got {n}"
            )));
        }
        if let Some(elev) = &self.elevation_ft
            && elev.len() != n
        {
            return Err(RouteReelError::validation(format!(
                "elevation_ft must match distance_mi length (got {} and {n})",
                elev.len()
            )));
        }
        if let Some(i) = self.distance_mi.iter().position(|d| !d.is_finite()) {
            return Err(RouteReelError::validation(format!(
                "distance_mi[{i}] is not finite"
            )));
        }
        if let Some(i) = self.speed_mph.iter().position(|v| !v.is_finite()) {
            return Err(RouteReelError::validation(format!(
                "speed_mph[{i}] is not finite"
            )));
        }
        if let Some(i) = self.distance_mi.windows(2).position(|w| w[1] < w[0]) {
            return Err(RouteReelError::validation(format!(
                "distance_mi must be non-decreasing (index {} < index {i})",
                i + 1
            )));
        }
        Ok(())
    }

    /// Copy with every distance clamped into `[0, max_mi]`, so pacing never runs past the route.
    pub fn clipped_to(&self, max_mi: f64) -> Self {
        Self {
            distance_mi: self
                .distance_mi
                .iter()
                .map(|d| d.clamp(0.0, max_mi))
                .collect(),
            speed_mph: self.speed_mph.clone(),
            elevation_ft: self.elevation_ft.clone(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.distance_mi.len()
    }

    /// `true` when there are no samples (never the case after validation).
    pub fn is_empty(&self) -> bool {
        self.distance_mi.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pace/samples.rs"]
mod tests;
