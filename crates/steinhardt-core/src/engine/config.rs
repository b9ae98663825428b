use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Spherical harmonic degree l must be at least 1, got {0}")]
    InvalidDegree(u32),

    #[error("Cutoff radius must be positive and finite, got {0}")]
    InvalidCutoff(f64),

    #[error("Minimum radius must be non-negative and below the cutoff {cutoff}, got {min_radius}")]
    InvalidMinRadius { min_radius: f64, cutoff: f64 },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{origin}': {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },
}

/// Which rotational invariant is extracted from the `q_lm` vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Invariant {
    /// Second-order invariant `Q_l`, real and non-negative.
    #[default]
    Ql,
    /// Third-order invariant `W_l`, complex in general.
    Wl,
}

/// Which `q_lm` vectors feed the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Averaging {
    /// Each particle's own bond average.
    #[default]
    Raw,
    /// The particle's raw vector averaged with those of its bonded neighbors.
    Neighborhood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    #[default]
    None,
    /// Every particle reports the invariant of the system-averaged `q_lm`.
    SystemAverage,
    /// `W_l` is divided by `(Σ_m |q_lm|²)^{3/2}`; `Q_l` is left unchanged.
    Magnitude,
}

/// The flag combination of a [`SteinhardtConfig`], resolved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComputationMode {
    pub invariant: Invariant,
    pub averaging: Averaging,
    pub normalization: Normalization,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SteinhardtConfig {
    pub l: u32,
    pub cutoff_radius: f64,
    #[serde(default)]
    pub min_radius: f64,
    #[serde(default)]
    pub average: bool,
    #[serde(default, alias = "Wl")]
    pub wl: bool,
    #[serde(default)]
    pub norm: bool,
    /// Overrides the normalization implied by `norm` when set.
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

impl SteinhardtConfig {
    /// Plain `Q_l` with every optional flag off.
    pub fn new(l: u32, cutoff_radius: f64) -> Self {
        Self {
            l,
            cutoff_radius,
            min_radius: 0.0,
            average: false,
            wl: false,
            norm: false,
            normalization: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.l < 1 {
            return Err(ConfigError::InvalidDegree(self.l));
        }
        if !(self.cutoff_radius.is_finite() && self.cutoff_radius > 0.0) {
            return Err(ConfigError::InvalidCutoff(self.cutoff_radius));
        }
        if !(self.min_radius.is_finite()
            && self.min_radius >= 0.0
            && self.min_radius < self.cutoff_radius)
        {
            return Err(ConfigError::InvalidMinRadius {
                min_radius: self.min_radius,
                cutoff: self.cutoff_radius,
            });
        }
        Ok(())
    }

    pub fn mode(&self) -> ComputationMode {
        let invariant = if self.wl { Invariant::Wl } else { Invariant::Ql };
        let averaging = if self.average {
            Averaging::Neighborhood
        } else {
            Averaging::Raw
        };
        let normalization = match (self.normalization, self.norm) {
            (Some(explicit), _) => explicit,
            (None, true) => Normalization::SystemAverage,
            (None, false) => Normalization::None,
        };
        ComputationMode {
            invariant,
            averaging,
            normalization,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            origin: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Default)]
pub struct SteinhardtConfigBuilder {
    l: Option<u32>,
    cutoff_radius: Option<f64>,
    min_radius: Option<f64>,
    average: bool,
    wl: bool,
    norm: bool,
    normalization: Option<Normalization>,
}

impl SteinhardtConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn l(mut self, l: u32) -> Self {
        self.l = Some(l);
        self
    }
    pub fn cutoff_radius(mut self, radius: f64) -> Self {
        self.cutoff_radius = Some(radius);
        self
    }
    pub fn min_radius(mut self, radius: f64) -> Self {
        self.min_radius = Some(radius);
        self
    }
    pub fn average(mut self, enabled: bool) -> Self {
        self.average = enabled;
        self
    }
    pub fn wl(mut self, enabled: bool) -> Self {
        self.wl = enabled;
        self
    }
    pub fn norm(mut self, enabled: bool) -> Self {
        self.norm = enabled;
        self
    }
    pub fn normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = Some(normalization);
        self
    }

    pub fn build(self) -> Result<SteinhardtConfig, ConfigError> {
        let config = SteinhardtConfig {
            l: self.l.ok_or(ConfigError::MissingParameter("l"))?,
            cutoff_radius: self
                .cutoff_radius
                .ok_or(ConfigError::MissingParameter("cutoff_radius"))?,
            min_radius: self.min_radius.unwrap_or(0.0),
            average: self.average,
            wl: self.wl,
            norm: self.norm,
            normalization: self.normalization,
        };
        config.validate()?;
        Ok(config)
    }
}
