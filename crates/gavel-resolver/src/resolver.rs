//! The resolution engine: depth-first traversal from seed coordinates
//! through parents, BOM imports and dependencies.
//!
//! Visiting a [`ResolveTask`] claims its coordinate, fetches the descriptor,
//! visits the parent and imported BOMs, then filters the declared
//! dependencies and visits the followed ones in declaration order. The walk
//! alone decides claim order and the exclusions each coordinate is expanded
//! with, so the result does not depend on timing. With more than one job,
//! followed dependencies are fetched on background tasks ahead of the walk.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt};
use gavel_core::config::{Config, DEFAULT_JOBS};
use gavel_core::coordinate::Coordinate;
use gavel_core::descriptor::{DependencyDecl, Descriptor, Exclusion};
use gavel_core::DEFAULT_SCOPE;
use gavel_maven::fetch::DescriptorFetcher;
use gavel_util::errors::GavelError;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::imports;
use crate::inheritance;
use crate::properties::{self, Properties};
use crate::resolved::{Claim, DescriptorSource, ResolvedSet};

/// Scopes whose dependencies are followed.
const FOLLOWED_SCOPES: [&str; 2] = ["compile", "runtime"];

/// Tuning knobs for a resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Maximum descriptor fetches in flight. `1` fetches strictly in walk
    /// order.
    pub jobs: usize,
    /// Edges from a seed after which a coordinate is refused.
    pub max_depth: Option<usize>,
    /// Abort everything on the first failure instead of skipping the subtree.
    pub fail_fast: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            max_depth: None,
            fail_fast: false,
        }
    }
}

impl From<&Config> for ResolveOptions {
    fn from(config: &Config) -> Self {
        Self {
            jobs: config.jobs.max(1),
            max_depth: config.max_depth,
            fail_fast: config.fail_fast,
        }
    }
}

/// One coordinate to resolve, with the exclusions in force on the path that
/// reached it.
#[derive(Debug, Clone)]
pub struct ResolveTask {
    pub coordinate: Coordinate,
    pub exclusions: Vec<Exclusion>,
    pub depth: usize,
}

impl ResolveTask {
    /// A seed: no exclusions, depth zero.
    pub fn seed(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            exclusions: Vec::new(),
            depth: 0,
        }
    }

    /// A parent or imported BOM: never excluded.
    fn ancestor(coordinate: Coordinate, depth: usize) -> Self {
        Self {
            coordinate,
            exclusions: Vec::new(),
            depth,
        }
    }
}

/// A coordinate that could not be resolved, and why.
#[derive(Debug)]
pub struct ResolutionFailure {
    pub coordinate: String,
    pub error: GavelError,
}

/// Output of a run: every resolved descriptor plus the failures.
#[derive(Debug, Default)]
pub struct Resolution {
    pub resolved: BTreeMap<String, Arc<Descriptor>>,
    pub failures: Vec<ResolutionFailure>,
}

impl Resolution {
    /// Resolved coordinate texts in lexicographic order.
    pub fn coordinates(&self) -> Vec<String> {
        self.resolved.keys().cloned().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What to do with one declared dependency.
enum Edge {
    Follow(ResolveTask),
    Skip(&'static str),
    Malformed(GavelError),
}

/// A descriptor fetch started ahead of the walk.
type Prefetch = JoinHandle<Result<Descriptor, GavelError>>;

/// Drives fetching and owns the resolved set.
pub struct Resolver<F> {
    fetcher: F,
    resolved: ResolvedSet,
    options: ResolveOptions,
    fetch_permits: Semaphore,
    prefetched: Mutex<HashMap<String, Prefetch>>,
    failures: Mutex<Vec<ResolutionFailure>>,
}

impl<F: DescriptorFetcher> Resolver<F> {
    pub fn new(fetcher: F, options: ResolveOptions) -> Self {
        let permits = options.jobs.max(1);
        Self {
            fetcher,
            resolved: ResolvedSet::new(),
            options,
            fetch_permits: Semaphore::new(permits),
            prefetched: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// The shared resolved set.
    pub fn resolved(&self) -> &ResolvedSet {
        &self.resolved
    }

    /// Resolve every seed, in order, and everything it transitively needs.
    ///
    /// Returns an error only in fail-fast mode; otherwise failures are
    /// collected for [`Resolver::resolution`].
    pub async fn resolve_all(
        self: &Arc<Self>,
        seeds: impl IntoIterator<Item = Coordinate>,
    ) -> Result<(), GavelError> {
        self.run(seeds.into_iter().map(ResolveTask::seed).collect())
            .await
    }

    /// Resolve one coordinate reached with `exclusions` in force.
    ///
    /// A coordinate already in the resolved set is a no-op.
    pub async fn resolve(
        self: &Arc<Self>,
        coordinate: Coordinate,
        exclusions: Vec<Exclusion>,
    ) -> Result<(), GavelError> {
        self.run(vec![ResolveTask {
            coordinate,
            exclusions,
            depth: 0,
        }])
        .await
    }

    /// Snapshot the resolved descriptors and take the failures recorded so far.
    pub fn resolution(&self) -> Resolution {
        let resolved = self.resolved.resolved();
        let failures = std::mem::take(
            &mut *self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
        .into_iter()
        // A depth refusal is moot if a shorter path resolved the coordinate.
        .filter(|f| {
            !(matches!(f.error, GavelError::ResolutionTooDeep { .. })
                && resolved.contains_key(&f.coordinate))
        })
        .collect();
        Resolution { resolved, failures }
    }

    async fn run(self: &Arc<Self>, tasks: Vec<ResolveTask>) -> Result<(), GavelError> {
        let mut outcome = Ok(());
        for task in tasks {
            if let Err(e) = self.visit(task).await {
                outcome = Err(e);
                break;
            }
        }
        self.cancel_prefetches();
        outcome
    }

    /// Claim, fetch and expand one coordinate, then its dependencies in
    /// declaration order.
    fn visit(self: &Arc<Self>, task: ResolveTask) -> BoxFuture<'_, Result<(), GavelError>> {
        async move {
            let key = task.coordinate.to_text();
            if self.resolved.contains(&key) {
                return Ok(());
            }
            if let Some(limit) = self.options.max_depth {
                if task.depth > limit {
                    let error = GavelError::ResolutionTooDeep {
                        coordinate: key.clone(),
                        depth: task.depth,
                    };
                    return self.record_failure(key, error);
                }
            }

            let guard = match self.resolved.claim(&key) {
                Claim::Fresh(guard) => guard,
                Claim::Existing => return Ok(()),
            };

            let descriptor = match self.fetch(&task.coordinate).await {
                Ok(descriptor) => {
                    let descriptor = Arc::new(descriptor);
                    guard.publish(Arc::clone(&descriptor));
                    descriptor
                }
                Err(e) => {
                    guard.fail();
                    return self.record_failure(key, e);
                }
            };
            debug!("Resolving {key} at depth {}", task.depth);

            // Parents are never excluded.
            if let Some(ref parent) = descriptor.parent {
                self.visit(ResolveTask::ancestor(parent.clone(), task.depth + 1))
                    .await?;
            }

            let properties = properties::effective_properties(&descriptor, &self.resolved);
            let exclusions = self.effective_exclusions(&descriptor, &task.exclusions);

            for import in imports::import_coordinates(&descriptor, &properties) {
                match import {
                    Ok(coordinate) => {
                        self.visit(ResolveTask::ancestor(coordinate, task.depth + 1))
                            .await?;
                    }
                    Err(e) => self.record_failure(format!("{key} (import)"), e)?,
                }
            }
            let import_table = imports::merge_imports(&descriptor, &properties, &self.resolved);

            let mut children = Vec::new();
            for dep in &descriptor.dependencies {
                let edge = self.plan_edge(
                    &descriptor,
                    dep,
                    &properties,
                    &import_table,
                    &exclusions,
                    task.depth,
                );
                match edge {
                    Edge::Follow(child) => children.push(child),
                    Edge::Skip(reason) => {
                        debug!("Skipping {}:{} from {key}: {reason}", dep.group, dep.artifact);
                    }
                    Edge::Malformed(e) => {
                        self.record_failure(format!("{key} -> {}", dep.artifact), e)?;
                    }
                }
            }

            self.prefetch(&children);
            for child in children {
                self.visit(child).await?;
            }
            Ok(())
        }
        .boxed()
    }

    /// The descriptor for a freshly claimed coordinate, from a running
    /// prefetch if there is one.
    async fn fetch(&self, coordinate: &Coordinate) -> Result<Descriptor, GavelError> {
        let key = coordinate.to_text();
        let prefetched = self
            .prefetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        match prefetched {
            Some(handle) => handle.await.map_err(|e| GavelError::Generic {
                message: format!("Fetch task for {key} failed: {e}"),
            })?,
            None => self.fetch_now(coordinate).await,
        }
    }

    async fn fetch_now(&self, coordinate: &Coordinate) -> Result<Descriptor, GavelError> {
        let _permit = self
            .fetch_permits
            .acquire()
            .await
            .map_err(|e| GavelError::Generic {
                message: format!("Fetch pool closed: {e}"),
            })?;
        self.fetcher.fetch(coordinate).await
    }

    /// Start fetching followed dependencies while the walk descends into the
    /// earlier ones.
    ///
    /// Every followed edge is visited by the walk, so each prefetched
    /// coordinate is one the walk fetches anyway. Claim order and exclusions
    /// stay with the walk.
    fn prefetch(self: &Arc<Self>, tasks: &[ResolveTask]) {
        if self.options.jobs <= 1 {
            return;
        }
        let mut prefetched = self
            .prefetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for task in tasks {
            if self.options.max_depth.is_some_and(|limit| task.depth > limit) {
                continue;
            }
            let key = task.coordinate.to_text();
            if prefetched.contains_key(&key) || self.resolved.contains(&key) {
                continue;
            }
            let resolver = Arc::clone(self);
            let coordinate = task.coordinate.clone();
            let handle = tokio::spawn(async move { resolver.fetch_now(&coordinate).await });
            prefetched.insert(key, handle);
        }
    }

    fn cancel_prefetches(&self) {
        let mut prefetched = self
            .prefetched
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in prefetched.drain() {
            handle.abort();
        }
    }

    /// Exclusions applying to `descriptor`'s own dependencies.
    ///
    /// With nothing passed in, the exclusions its parent chain manages for
    /// this artifact are used.
    fn effective_exclusions(
        &self,
        descriptor: &Descriptor,
        passed: &[Exclusion],
    ) -> Vec<Exclusion> {
        if !passed.is_empty() {
            return passed.to_vec();
        }
        let coordinate = &descriptor.coordinate;
        descriptor
            .parent
            .as_ref()
            .and_then(|parent| self.resolved.descriptor(parent))
            .and_then(|parent| {
                inheritance::find_managed_entry(
                    &coordinate.group,
                    &coordinate.artifact,
                    &parent,
                    &self.resolved,
                )
            })
            .map(|entry| entry.exclusions)
            .unwrap_or_default()
    }

    /// Apply defaults and filters to one declared dependency.
    fn plan_edge(
        &self,
        owner: &Descriptor,
        dep: &DependencyDecl,
        properties: &Properties,
        import_table: &[DependencyDecl],
        exclusions: &[Exclusion],
        depth: usize,
    ) -> Edge {
        let group = properties::substitute(&dep.group, properties);
        let artifact = dep.artifact.as_str();
        let inherited =
            inheritance::inherited_defaults(&group, artifact, owner, properties, &self.resolved)
                .unwrap_or_default();

        let mut version = dep.version.clone();
        if version.is_empty() {
            if let Some(entry) = imports::find_first_match(import_table, &group, artifact) {
                version = entry.version.clone();
            }
        }

        let scope = if !dep.scope.is_empty() {
            dep.scope.as_str()
        } else if !inherited.scope.is_empty() {
            inherited.scope.as_str()
        } else {
            DEFAULT_SCOPE
        };
        let optional = dep.optional || inherited.optional;

        if exclusions.iter().any(|e| e.matches(&group, artifact)) {
            return Edge::Skip("excluded");
        }
        if !FOLLOWED_SCOPES.contains(&scope) {
            return Edge::Skip("scope");
        }
        if optional {
            return Edge::Skip("optional");
        }

        let own = &owner.coordinate;
        let group = first_non_empty([group, inherited.group.clone(), own.group.clone()]);
        let version = first_non_empty([
            properties::substitute(&version, properties),
            inherited.version.clone(),
            own.version.clone(),
        ]);

        let coordinate = match Coordinate::new(group, artifact, version) {
            Ok(coordinate) => coordinate,
            Err(e) => return Edge::Malformed(e),
        };

        let declared = if dep.exclusions.is_empty() {
            &inherited.exclusions
        } else {
            &dep.exclusions
        };
        let mut child_exclusions = exclusions.to_vec();
        for exclusion in declared {
            if !child_exclusions.contains(exclusion) {
                child_exclusions.push(exclusion.clone());
            }
        }

        Edge::Follow(ResolveTask {
            coordinate,
            exclusions: child_exclusions,
            depth: depth + 1,
        })
    }

    /// Record a per-coordinate failure, or return it in fail-fast mode.
    ///
    /// Errors that do not belong to one coordinate always abort. Depth
    /// refusals never do, since another path may still resolve the
    /// coordinate.
    fn record_failure(&self, coordinate: String, error: GavelError) -> Result<(), GavelError> {
        let too_deep = matches!(error, GavelError::ResolutionTooDeep { .. });
        if (self.options.fail_fast && !too_deep) || !error.is_per_coordinate() {
            return Err(error);
        }
        warn!("{coordinate}: {error}");
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ResolutionFailure { coordinate, error });
        Ok(())
    }
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}
