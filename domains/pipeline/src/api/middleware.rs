//! Pipeline domain state

use printloom_export::ExportPackager;
use printloom_gateway::mock::MockGateway;

use crate::orchestrator::PipelineOrchestrator;

/// Application state for the Pipeline domain
#[derive(Clone)]
pub struct PipelineState {
    pub orchestrator: PipelineOrchestrator,
    pub packager: ExportPackager,
    /// Present when the mock gateway provider is active
    pub mock_gateway: Option<MockGateway>,
}
