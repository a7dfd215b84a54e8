//! Ordered generation phases.

/// One phase of terrain generation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Session setup and sampler construction.
    Setup,
    /// Domain warp field.
    Warp,
    /// Land/ocean classification.
    Coastline,
    /// Layered height synthesis.
    BaseTerrain,
    /// Ridged mountain pass.
    Ridges,
    /// Thermal and hydraulic erosion.
    Erosion,
    /// Mesh buffer allocation.
    MeshSetup,
    /// Vertex positions and colors.
    Vertices,
    /// Vertex normals.
    Normals,
    /// Index buffer.
    Triangles,
    /// Final mesh hand-off.
    Assembly,
    /// Terrain statistics.
    Stats,
}

impl Phase {
    pub const ALL: [Phase; 12] = [
        Phase::Setup,
        Phase::Warp,
        Phase::Coastline,
        Phase::BaseTerrain,
        Phase::Ridges,
        Phase::Erosion,
        Phase::MeshSetup,
        Phase::Vertices,
        Phase::Normals,
        Phase::Triangles,
        Phase::Assembly,
        Phase::Stats,
    ];

    pub const COUNT: u8 = 12;

    /// 1-based phase number reported to hosts.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Warp => "domain warp",
            Phase::Coastline => "coastline",
            Phase::BaseTerrain => "base terrain",
            Phase::Ridges => "ridges",
            Phase::Erosion => "erosion",
            Phase::MeshSetup => "mesh setup",
            Phase::Vertices => "vertices",
            Phase::Normals => "normals",
            Phase::Triangles => "triangles",
            Phase::Assembly => "assembly",
            Phase::Stats => "statistics",
        }
    }

    pub fn next(self) -> Option<Phase> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Overall progress range `(start, end)` covered by this phase.
    pub fn span(self) -> (f32, f32) {
        match self {
            Phase::Setup => (0.0, 0.05),
            Phase::Warp => (0.05, 0.10),
            Phase::Coastline => (0.10, 0.20),
            Phase::BaseTerrain => (0.20, 0.35),
            Phase::Ridges => (0.35, 0.45),
            Phase::Erosion => (0.45, 0.60),
            Phase::MeshSetup => (0.60, 0.65),
            Phase::Vertices => (0.65, 0.75),
            Phase::Normals => (0.75, 0.80),
            Phase::Triangles => (0.80, 0.90),
            Phase::Assembly => (0.90, 0.95),
            Phase::Stats => (0.95, 1.0),
        }
    }

    /// Overall progress at `fraction` (clamped to [0, 1]) of the way through this phase.
    pub fn progress_at(self, fraction: f32) -> f32 {
        let (start, end) = self.span();
        start + (end - start) * fraction.clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_order() {
        for (k, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.number() as usize, k + 1);
        }
        assert_eq!(Phase::Stats.number(), Phase::COUNT);
        assert_eq!(Phase::Setup.next(), Some(Phase::Warp));
        assert_eq!(Phase::Stats.next(), None);
    }

    #[test]
    fn test_spans_are_contiguous() {
        assert_eq!(Phase::Setup.span().0, 0.0);
        assert_eq!(Phase::Stats.span().1, 1.0);
        for pair in Phase::ALL.windows(2) {
            let (_, end) = pair[0].span();
            let (start, _) = pair[1].span();
            assert!((end - start).abs() < 1e-6);
            assert!(pair[0].span().0 < end);
        }
    }

    #[test]
    fn test_progress_at() {
        assert!((Phase::Erosion.progress_at(0.5) - 0.525).abs() < 1e-6);
        assert!((Phase::Warp.progress_at(-1.0) - 0.05).abs() < 1e-6);
        assert!((Phase::Warp.progress_at(2.0) - 0.10).abs() < 1e-6);
    }
}
