use crate::error::{DashboardError, InsightError};
use crate::insight::{CompletionTransport, HttpTransport, InsightClient, InsightConfig};
use crate::kpi::{self, KpiSummary};
use crate::parser::{self, Dataset};
use crate::report;
use crate::schema::Role;
use std::path::Path;

/// One slot per role. Loading a dataset replaces whatever its slot held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    inbound: Option<Dataset>,
    outbound: Option<Dataset>,
    inventory: Option<Dataset>,
}

impl Datasets {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<Dataset> {
        match role {
            Role::Inbound => &mut self.inbound,
            Role::Outbound => &mut self.outbound,
            Role::Inventory => &mut self.inventory,
        }
    }

    pub fn get(&self, role: Role) -> Option<&Dataset> {
        match role {
            Role::Inbound => self.inbound.as_ref(),
            Role::Outbound => self.outbound.as_ref(),
            Role::Inventory => self.inventory.as_ref(),
        }
    }

    /// Puts `dataset` in its role's slot and returns the one it replaced.
    pub fn set(&mut self, dataset: Dataset) -> Option<Dataset> {
        self.slot_mut(dataset.role()).replace(dataset)
    }

    pub fn clear(&mut self, role: Role) -> Option<Dataset> {
        self.slot_mut(role).take()
    }

    pub fn is_complete(&self) -> bool {
        self.all().is_some()
    }

    pub fn all(&self) -> Option<(&Dataset, &Dataset, &Dataset)> {
        Some((self.inbound.as_ref()?, self.outbound.as_ref()?, self.inventory.as_ref()?))
    }

    /// Row count per role; None for an empty slot.
    pub fn row_counts(&self) -> [(Role, Option<usize>); 3] {
        Role::ALL.map(|r| (r, self.get(r).map(Dataset::len)))
    }
}

/// Dataset slots plus the report derived from them.
///
/// The summary and report exist exactly when all three slots are filled, and
/// are rebuilt in full after every slot change.
pub struct Dashboard<T = HttpTransport> {
    datasets: Datasets,
    summary: Option<KpiSummary>,
    report: Option<String>,
    client: InsightClient<T>,
}

impl Dashboard<HttpTransport> {
    pub fn new(config: InsightConfig) -> Self {
        Self::with_client(InsightClient::new(config))
    }
}

impl<T: CompletionTransport> Dashboard<T> {
    pub fn with_client(client: InsightClient<T>) -> Self {
        Self { datasets: Datasets::new(), summary: None, report: None, client }
    }

    pub fn datasets(&self) -> &Datasets { &self.datasets }
    pub fn summary(&self) -> Option<&KpiSummary> { self.summary.as_ref() }
    pub fn report(&self) -> Option<&str> { self.report.as_deref() }
    pub fn client(&self) -> &InsightClient<T> { &self.client }
    pub fn is_ready(&self) -> bool { self.report.is_some() }

    pub fn load(&mut self, dataset: Dataset) {
        let missing = dataset.missing_columns();
        if !missing.is_empty() {
            tracing::warn!(role = %dataset.role(), ?missing, "dataset lacks expected columns");
        }
        tracing::info!(role = %dataset.role(), rows = dataset.len(), "dataset loaded");
        self.datasets.set(dataset);
        self.recompute();
    }

    /// Parses and loads CSV text, returning the row count. On error nothing changes.
    pub fn load_csv_str(&mut self, role: Role, text: &str) -> Result<usize, DashboardError> {
        let dataset = parser::parse_csv_str(role, text)?;
        let rows = dataset.len();
        self.load(dataset);
        Ok(rows)
    }

    pub fn load_csv_file(&mut self, role: Role, path: &Path) -> Result<usize, DashboardError> {
        let dataset = parser::load_csv_file(role, path)?;
        let rows = dataset.len();
        self.load(dataset);
        Ok(rows)
    }

    pub fn clear(&mut self, role: Role) {
        if self.datasets.clear(role).is_some() {
            tracing::info!(%role, "dataset cleared");
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.summary = kpi::summarize(&self.datasets);
        self.report = self.summary.as_ref().map(report::render);
    }

    /// Asks one question about the current report.
    ///
    /// Takes `&mut self` so a dashboard never has two questions in flight.
    pub async fn ask(&mut self, credential: &str, question: &str) -> Result<String, DashboardError> {
        let answer: Result<String, InsightError> =
            self.client.ask(credential, question, self.report.as_deref()).await;
        Ok(answer?)
    }
}
