//! Scene context owned by the outer loop.
//!
//! [`SimulationContext`] holds everything the frame loop needs: the current
//! network, the scene configuration, the RNG and the presentation flags.
//! Input sources translate their events into [`Command`]s and hand them to
//! [`SimulationContext::apply`].

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::{
    config::SceneConfig,
    error::SceneError,
    network::{GrowthNetwork, StepReport},
    shapes::BoundaryShape,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuild boundary, obstacles, sources and roots for a shape.
    Reset(BoundaryShape),
    ToggleBoundsVisible,
    ToggleObstaclesVisible,
    ToggleSourcesVisible,
    ToggleAttractionZones,
    TogglePause,
}

/// Presentation flags. They never affect growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewFlags {
    pub show_bounds: bool,
    pub show_obstacles: bool,
    pub show_sources: bool,
    pub show_attraction_zones: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            show_bounds: true,
            show_obstacles: true,
            show_sources: true,
            show_attraction_zones: false,
        }
    }
}

#[derive(Debug)]
pub struct SimulationContext {
    pub config: SceneConfig,
    shape: BoundaryShape,
    network: GrowthNetwork,
    rng: ChaCha8Rng,
    pub view: ViewFlags,
    pub paused: bool,
    last_report: Option<StepReport>,
}

impl SimulationContext {
    /// Validates `config` and builds the first scene for `shape`.
    pub fn new(config: SceneConfig, shape: BoundaryShape) -> Result<Self, SceneError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let network = build_network(&config, shape, &mut rng)?;
        Ok(Self {
            config,
            shape,
            network,
            rng,
            view: ViewFlags::default(),
            paused: false,
            last_report: None,
        })
    }

    pub fn network(&self) -> &GrowthNetwork {
        &self.network
    }

    pub fn shape(&self) -> BoundaryShape {
        self.shape
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    /// Applies a command.
    ///
    /// A failed reset leaves the current scene untouched.
    pub fn apply(&mut self, cmd: Command) -> Result<(), SceneError> {
        match cmd {
            Command::Reset(shape) => self.reset(shape)?,
            Command::ToggleBoundsVisible => self.view.show_bounds ^= true,
            Command::ToggleObstaclesVisible => self.view.show_obstacles ^= true,
            Command::ToggleSourcesVisible => self.view.show_sources ^= true,
            Command::ToggleAttractionZones => self.view.show_attraction_zones ^= true,
            Command::TogglePause => self.paused ^= true,
        }
        Ok(())
    }

    /// Runs one step, ignoring the pause flag.
    pub fn step(&mut self) -> &StepReport {
        let report = self.network.step();
        self.last_report.insert(report)
    }

    /// Runs one step unless paused.
    pub fn tick(&mut self) -> Option<&StepReport> {
        if self.paused {
            return None;
        }
        Some(self.step())
    }

    fn reset(&mut self, shape: BoundaryShape) -> Result<(), SceneError> {
        match build_network(&self.config, shape, &mut self.rng) {
            Ok(network) => {
                self.network = network;
                self.shape = shape;
                self.last_report = None;
                Ok(())
            }
            Err(e) => {
                error!(shape = shape.name(), error = %e, "scene reset failed");
                Err(e)
            }
        }
    }
}

fn build_network(
    config: &SceneConfig,
    shape: BoundaryShape,
    rng: &mut ChaCha8Rng,
) -> Result<GrowthNetwork, SceneError> {
    config.growth.validate()?;

    let boundary = shape.polygon(config.center)?;
    let obstacles = config.obstacle_polygons()?;
    let sources = config.pattern.generate(
        &config.growth,
        &boundary,
        &obstacles,
        config.max_attempts_per_source,
        rng,
    )?;
    let roots = shape.root_candidates(config.center, &boundary, rng);

    let mut network = GrowthNetwork::new(boundary, obstacles, sources, config.growth);
    let placed = roots
        .into_iter()
        .filter_map(|p| network.add_root(p))
        .count();

    info!(
        shape = shape.name(),
        roots = placed,
        sources = network.sources().len(),
        "scene built"
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ObstacleConfig,
        error::{ConfigError, GenerationError},
        patterns::SourcePattern,
    };
    use glam::Vec2;

    fn small_scene() -> SceneConfig {
        SceneConfig {
            pattern: SourcePattern::Scatter { count: 200 },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn new_builds_every_shape_with_roots_and_sources() {
        for shape in BoundaryShape::ALL {
            let ctx = SimulationContext::new(small_scene(), shape).unwrap();
            let net = ctx.network();
            assert!(!net.nodes().is_empty(), "{} has no roots", shape.name());
            assert_eq!(net.sources().len(), 200);
            assert_eq!(ctx.shape(), shape);
        }
    }

    #[test]
    fn toggles_flip_flags_without_touching_the_network() {
        let mut ctx = SimulationContext::new(small_scene(), BoundaryShape::Circle).unwrap();
        let nodes = ctx.network().nodes().len();

        ctx.apply(Command::ToggleBoundsVisible).unwrap();
        ctx.apply(Command::ToggleObstaclesVisible).unwrap();
        ctx.apply(Command::ToggleAttractionZones).unwrap();
        ctx.apply(Command::ToggleSourcesVisible).unwrap();

        assert!(!ctx.view.show_bounds);
        assert!(!ctx.view.show_obstacles);
        assert!(ctx.view.show_attraction_zones);
        assert!(!ctx.view.show_sources);
        assert_eq!(ctx.network().nodes().len(), nodes);
        assert_eq!(ctx.network().steps(), 0);

        ctx.apply(Command::ToggleBoundsVisible).unwrap();
        assert!(ctx.view.show_bounds);
    }

    #[test]
    fn reset_replaces_the_network() {
        let mut ctx = SimulationContext::new(small_scene(), BoundaryShape::Circle).unwrap();
        for _ in 0..20 {
            ctx.step();
        }
        assert!(ctx.network().steps() > 0);
        assert!(ctx.last_report().is_some());

        ctx.apply(Command::Reset(BoundaryShape::Leaf)).unwrap();

        assert_eq!(ctx.shape(), BoundaryShape::Leaf);
        assert_eq!(ctx.network().steps(), 0);
        assert_eq!(ctx.network().nodes().len(), 1);
        assert!(ctx.last_report().is_none());
    }

    #[test]
    fn paused_tick_does_nothing() {
        let mut ctx = SimulationContext::new(small_scene(), BoundaryShape::Circle).unwrap();
        ctx.apply(Command::TogglePause).unwrap();

        assert!(ctx.tick().is_none());
        assert_eq!(ctx.network().steps(), 0);

        ctx.apply(Command::TogglePause).unwrap();
        assert_eq!(ctx.tick().map(|r| r.step), Some(1));
    }

    #[test]
    fn failed_reset_keeps_previous_scene() {
        let mut ctx = SimulationContext::new(small_scene(), BoundaryShape::Circle).unwrap();
        ctx.config.obstacles = vec![ObstacleConfig::Circle {
            offset: Vec2::ZERO,
            radius: 2000.0,
            resolution: 64,
        }];
        ctx.config.max_attempts_per_source = 20;

        let err = ctx.apply(Command::Reset(BoundaryShape::Square)).unwrap_err();

        assert!(matches!(
            err,
            SceneError::Generation(GenerationError::InsufficientSpace { .. })
        ));
        assert_eq!(ctx.shape(), BoundaryShape::Circle);
        assert_eq!(ctx.network().sources().len(), 200);
    }

    #[test]
    fn new_rejects_invalid_growth_config() {
        let mut config = small_scene();
        config.growth.consume_radius = 500.0;

        let err = SimulationContext::new(config, BoundaryShape::Circle).unwrap_err();

        assert!(matches!(
            err,
            SceneError::Config(ConfigError::ConsumeExceedsInfluence { .. })
        ));
    }

    #[test]
    fn same_seed_gives_same_scene() {
        let a = SimulationContext::new(small_scene(), BoundaryShape::Square).unwrap();
        let b = SimulationContext::new(small_scene(), BoundaryShape::Square).unwrap();

        assert_eq!(a.network().nodes(), b.network().nodes());
        assert_eq!(a.network().sources(), b.network().sources());
    }
}
