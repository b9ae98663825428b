use crate::core::harmonics::spherical::SphericalHarmonicEvaluator;
use crate::core::models::simulation_box::{PeriodicGeometry, SimulationBox};
use crate::core::neighbors::finder::{NeighborFinder, NeighborList};
use crate::engine::config::{Averaging, ComputationMode, ConfigError, Invariant, SteinhardtConfig};
use crate::engine::context::ComputeContext;
use crate::engine::error::{EngineError, ValidationError};
use crate::engine::progress::{Phase, Progress, ProgressReporter};
use crate::engine::state::{OrderValue, OrderValues, QlmField};
use crate::engine::tasks::invariants::InvariantKernel;
use crate::engine::tasks::{averaging, invariants, qlm};
use nalgebra::Point3;
use num_complex::Complex64;
use tracing::{debug, info, instrument, warn};

/// Outcome of one [`Steinhardt::compute`] call, aligned with the input positions.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParameterResult {
    values: OrderValues,
    simulation_box: SimulationBox,
    neighbor_counts: Vec<usize>,
    qlm: QlmField,
    system_qlm: Vec<Complex64>,
    system_value: OrderValue,
}

impl OrderParameterResult {
    /// Per-particle order parameter: real for `Q_l`, complex for `W_l`.
    pub fn values(&self) -> &OrderValues {
        &self.values
    }

    pub fn simulation_box(&self) -> &SimulationBox {
        &self.simulation_box
    }

    pub fn num_particles(&self) -> usize {
        self.values.len()
    }

    pub fn neighbor_counts(&self) -> &[usize] {
        &self.neighbor_counts
    }

    /// The `q_lm` vector of particle `index` that fed its invariant, after any
    /// neighborhood averaging.
    pub fn particle_qlm(&self, index: usize) -> Option<&[Complex64]> {
        (index < self.qlm.num_particles()).then(|| self.qlm.particle(index))
    }

    /// Mean of the per-particle `q_lm` vectors.
    pub fn system_qlm(&self) -> &[Complex64] {
        &self.system_qlm
    }

    /// Invariant of [`Self::system_qlm`].
    pub fn system_value(&self) -> OrderValue {
        self.system_value
    }

    /// Arithmetic mean of the per-particle values.
    pub fn mean(&self) -> Complex64 {
        self.values.mean()
    }
}

/// Steinhardt bond-orientational order parameter for a fixed degree `l`.
///
/// The configuration is validated once at construction; each
/// [`compute`](Self::compute) call is independent and keeps no state.
#[derive(Debug, Clone)]
pub struct Steinhardt {
    config: SteinhardtConfig,
    mode: ComputationMode,
    evaluator: SphericalHarmonicEvaluator,
    kernel: InvariantKernel,
    finder: NeighborFinder,
}

impl Steinhardt {
    pub fn new(config: SteinhardtConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.mode();
        let kernel = match mode.invariant {
            Invariant::Ql => InvariantKernel::ql(config.l),
            Invariant::Wl => InvariantKernel::wl(config.l),
        };
        let finder = NeighborFinder::new(config.cutoff_radius)
            .with_min_radius(config.min_radius);
        debug!(l = config.l, mode = ?mode, "Configured Steinhardt order parameter.");

        Ok(Self {
            evaluator: SphericalHarmonicEvaluator::new(config.l),
            config,
            mode,
            kernel,
            finder,
        })
    }

    /// Plain `Q_l` with averaging and normalization disabled.
    pub fn with_degree(l: u32, cutoff_radius: f64) -> Result<Self, ConfigError> {
        Self::new(SteinhardtConfig::new(l, cutoff_radius))
    }

    pub fn config(&self) -> &SteinhardtConfig {
        &self.config
    }

    pub fn mode(&self) -> ComputationMode {
        self.mode
    }

    pub fn compute(
        &self,
        positions: &[Point3<f64>],
        simulation_box: &SimulationBox,
    ) -> Result<OrderParameterResult, EngineError> {
        self.compute_with_progress(positions, simulation_box, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "steinhardt_workflow", fields(l = self.config.l))]
    pub fn compute_with_progress(
        &self,
        positions: &[Point3<f64>],
        simulation_box: &SimulationBox,
        reporter: &ProgressReporter,
    ) -> Result<OrderParameterResult, EngineError> {
        self.validate(positions, simulation_box)?;
        info!(
            particles = positions.len(),
            cutoff = self.config.cutoff_radius,
            "Computing Steinhardt order parameter."
        );

        let neighbors = reporter.phase(Phase::NeighborSearch, || {
            self.finder.find(positions, simulation_box)
        });
        report_neighbor_statistics(&neighbors, reporter);

        let context = ComputeContext::new(&neighbors, &self.evaluator);
        let raw = reporter.phase(Phase::Accumulation, || qlm::run(&context));

        let field = match self.mode.averaging {
            Averaging::Raw => raw,
            Averaging::Neighborhood => {
                reporter.phase(Phase::Averaging, || averaging::run(&context, &raw))
            }
        };

        let normalization = self.mode.normalization;
        let values = reporter.phase(Phase::Invariants, || {
            invariants::run(&field, &self.kernel, normalization)
        });
        let system_qlm = field.mean();
        let system_value = self.kernel.evaluate(&system_qlm, normalization);

        let result = OrderParameterResult {
            values,
            simulation_box: *simulation_box,
            neighbor_counts: neighbors.neighbor_counts(),
            qlm: field,
            system_qlm,
            system_value,
        };
        info!(
            mean = result.mean().re,
            system = result.system_value.re(),
            "Steinhardt order parameter complete."
        );
        reporter.report(Progress::Message(format!(
            "{:?}{} evaluated for {} particles.",
            self.mode.invariant,
            self.config.l,
            result.num_particles()
        )));
        Ok(result)
    }

    fn validate(
        &self,
        positions: &[Point3<f64>],
        simulation_box: &SimulationBox,
    ) -> Result<(), ValidationError> {
        if positions.is_empty() {
            return Err(ValidationError::EmptyPositions);
        }
        if let Some(index) = positions
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(ValidationError::NonFinitePosition { index });
        }
        if simulation_box.is_2d() {
            return Err(ValidationError::DimensionMismatch);
        }
        let limit = simulation_box.perpendicular_widths().min() / 2.0;
        if self.config.cutoff_radius > limit {
            return Err(ValidationError::CutoffExceedsBox {
                cutoff: self.config.cutoff_radius,
                limit,
            });
        }
        Ok(())
    }
}

fn report_neighbor_statistics(neighbors: &NeighborList, reporter: &ProgressReporter) {
    let total_bonds = neighbors.total_bonds();
    let isolated_particles = neighbors.iter().filter(|bonds| bonds.is_empty()).count();
    reporter.report(Progress::NeighborsFound {
        total_bonds,
        isolated_particles,
    });

    if isolated_particles == neighbors.num_particles() {
        warn!("No particle has a neighbor within the cutoff; every q_lm is zero.");
    } else if isolated_particles > 0 {
        warn!(
            isolated_particles,
            "Some particles have no neighbors; their q_lm is zero."
        );
    }
    debug!(total_bonds, isolated_particles, "Neighbor statistics.");
}
