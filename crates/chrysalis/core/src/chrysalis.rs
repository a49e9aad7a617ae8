//! The crystallization engine.
//!
//! `Chrysalis` ties the layers together: constraints are declared (Mental),
//! a domain is generated (Void) and narrowed (Astral), the chosen survivor
//! is bound and persisted (Etheric), and each cycle leaves a trace
//! (Physical). Reflection and perturbation extend the system between
//! cycles.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrysalis_etheric::{recover, JsonFileStore, PersistedRecord, RecordStore};
use chrysalis_types::{Candidate, ChrysalisConfig, ConstraintSource, ConstraintSpec, Domain, Layer};
use tracing::{info, warn};

use crate::binder::Binder;
use crate::constraint::{ConstraintDescriptor, ConstraintRegistry, Predicate};
use crate::error::{ChrysalisError, ChrysalisResult};
use crate::narrowing::{self, Exploration};
use crate::perturbator::{Perturbator, VocabularyExpansions};
use crate::reflector::Reflector;
use crate::trace::{CrystallizationTrace, TraceId};
use crate::void::{DomainGenerator, Experience, Vocabulary};

/// One self-evolving constraint system.
///
/// Single-threaded: every operation runs to completion before the next.
pub struct Chrysalis {
    config: ChrysalisConfig,
    registry: ConstraintRegistry,
    binder: Binder,
    experience: Experience,
    expansions: VocabularyExpansions,
    generator: DomainGenerator,
    perturbator: Perturbator,
    reflector: Reflector,
    last_trace: Option<CrystallizationTrace>,
    birth: DateTime<Utc>,
}

impl Chrysalis {
    /// A first-life instance with the default configuration.
    pub fn new() -> Self {
        Self::build(ChrysalisConfig::default())
    }

    pub fn with_config(config: ChrysalisConfig) -> ChrysalisResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ChrysalisConfig) -> Self {
        Self {
            registry: ConstraintRegistry::new(),
            binder: Binder::new(),
            experience: Experience::new(config.history_window),
            expansions: VocabularyExpansions::new(),
            generator: DomainGenerator::new(config.max_domain_size),
            perturbator: Perturbator::new(config.max_perturbation_depth),
            reflector: Reflector::new(),
            last_trace: None,
            birth: Utc::now(),
            config,
        }
    }

    // ── Mental: declaration ─────────────────────────────────────────

    /// Declare a constraint backed by native code.
    ///
    /// A closure that panics rejects the candidate it was testing. Under a
    /// `panic = "abort"` profile the panic still ends the process, so
    /// predicates should not panic.
    pub fn declare<F>(
        &mut self,
        name: impl Into<String>,
        test: F,
        layer: Layer,
        source: ConstraintSource,
    ) -> ChrysalisResult<ConstraintDescriptor>
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        self.declare_predicate(name, Predicate::native(test), layer, source)
    }

    /// Declare a constraint from the description language.
    pub fn declare_spec(
        &mut self,
        name: impl Into<String>,
        spec: ConstraintSpec,
        layer: Layer,
        source: ConstraintSource,
    ) -> ChrysalisResult<ConstraintDescriptor> {
        self.declare_predicate(name, Predicate::Spec(spec), layer, source)
    }

    fn declare_predicate(
        &mut self,
        name: impl Into<String>,
        predicate: Predicate,
        layer: Layer,
        source: ConstraintSource,
    ) -> ChrysalisResult<ConstraintDescriptor> {
        let cycle = self.binder.cycle_count();
        let constraint = self
            .registry
            .declare(name, predicate, layer, source, cycle)?;
        Ok(constraint.describe())
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    // ── Void + Astral ───────────────────────────────────────────────

    /// The domain the next cycle would use.
    pub fn generate_domain(&self) -> Domain {
        self.generator
            .generate_domain(self.binder.state(), &self.experience, &self.expansions)
    }

    /// Narrow `domain` through the active constraints without binding.
    pub fn explore(&self, domain: &[Candidate]) -> Exploration {
        narrowing::explore(domain, self.registry.list_active())
    }

    /// First survivor of `domain`, without binding.
    pub fn resolve(&self, domain: &[Candidate]) -> ChrysalisResult<Candidate> {
        narrowing::resolve(domain, self.registry.list_active())
    }

    // ── Cycles ──────────────────────────────────────────────────────

    /// Crystallize a generated domain.
    pub fn crystallize(&mut self) -> ChrysalisResult<CrystallizationTrace> {
        let domain = self.generate_domain();
        self.cycle(domain)
    }

    /// Crystallize a caller-supplied domain: narrow, bind, persist, record.
    ///
    /// On `Unsatisfiable` nothing is bound and state, cycle count and
    /// experience are unchanged.
    pub fn cycle(&mut self, domain: Domain) -> ChrysalisResult<CrystallizationTrace> {
        let exploration = self.explore(&domain);
        let Some(result) = exploration.chosen().cloned() else {
            warn!(
                domain_size = domain.len(),
                constraints = self.registry.len(),
                "crystallization unsatisfiable"
            );
            return Err(ChrysalisError::Unsatisfiable {
                domain_size: domain.len(),
                constraint_count: self.registry.len(),
            });
        };

        self.experience.record(&result, &exploration.survivors);
        let (cycle, persisted) = self.bind(result.clone());

        let trace = CrystallizationTrace {
            id: TraceId::new(),
            cycle,
            domain,
            constraints: self.registry.descriptors(),
            narrowing: exploration.steps,
            survivors: exploration.survivors,
            result,
            bound_at: Utc::now(),
            persisted,
        };
        self.last_trace = Some(trace.clone());
        Ok(trace)
    }

    // ── Etheric: binding and persistence ────────────────────────────

    /// Bind `candidate` as the new state and persist if a substrate is
    /// attached. Returns the new cycle number and whether it was persisted.
    pub fn bind(&mut self, candidate: Candidate) -> (u64, bool) {
        let cycle = self.binder.bind(candidate);
        let persisted = self.binder.persist(&self.snapshot());
        (cycle, persisted)
    }

    /// Bind to a JSON record at `location`, continuing from it if present.
    ///
    /// Returns true when a previous lifetime was adopted.
    pub fn bind_etheric(&mut self, location: impl Into<PathBuf>) -> bool {
        self.bind_store(Box::new(JsonFileStore::new(location)))
    }

    /// Bind to an arbitrary store, continuing from its record if usable.
    pub fn bind_store(&mut self, store: Box<dyn RecordStore>) -> bool {
        let continued = match recover(store.as_ref()) {
            Some(record) => {
                self.adopt(record);
                true
            }
            None => false,
        };
        self.binder.attach(store);
        continued
    }

    /// Write the full record to `location`.
    pub fn save(&self, location: impl Into<PathBuf>) -> ChrysalisResult<()> {
        let store = JsonFileStore::new(location);
        store.save(&self.snapshot())?;
        info!(location = %store.location(), cycle_count = self.cycle_count(), "record saved");
        Ok(())
    }

    /// Load the record at `location` into this instance.
    ///
    /// Unlike [`bind_etheric`](Self::bind_etheric) this reports unreadable
    /// records. Returns false when no record exists.
    pub fn load(&mut self, location: impl Into<PathBuf>) -> ChrysalisResult<bool> {
        let store = JsonFileStore::new(location);
        match store.load()? {
            Some(record) => {
                self.adopt(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn adopt(&mut self, record: PersistedRecord) {
        info!(cycle_count = record.cycle_count, "adopting previous lifetime");
        self.binder.restore(record.state, record.cycle_count);
        self.expansions = VocabularyExpansions::from_map(record.vocabulary_expansions);
        self.experience = Experience::from_history(self.config.history_window, record.history);
        if let Some(birth) = record.birth {
            self.birth = birth;
        }
    }

    /// The record that would be persisted now.
    pub fn snapshot(&self) -> PersistedRecord {
        PersistedRecord {
            state: self.binder.state().clone(),
            cycle_count: self.binder.cycle_count(),
            vocabulary_expansions: self.expansions.to_map(),
            birth: Some(self.birth),
            history: self.experience.to_history(),
            ..PersistedRecord::default()
        }
        .stamped()
    }

    // ── Reflection and perturbation ─────────────────────────────────

    /// Reflect on the last crystallization and register a constraint that
    /// would disambiguate it.
    pub fn reflect(&mut self) -> ChrysalisResult<Option<ConstraintDescriptor>> {
        Ok(self.reflect_on_key()?.map(|(descriptor, _)| descriptor))
    }

    /// Reflection that also reports the differentiating key it chose.
    pub(crate) fn reflect_on_key(
        &mut self,
    ) -> ChrysalisResult<Option<(ConstraintDescriptor, String)>> {
        let Some(trace) = self.last_trace.as_ref() else {
            return Ok(None);
        };
        let registry = &self.registry;
        let Some(proposal) = self
            .reflector
            .propose(&trace.survivors, |name| registry.contains(name))
        else {
            return Ok(None);
        };
        let witness = trace
            .survivors
            .iter()
            .find(|s| proposal.spec.evaluate(s))
            .cloned();

        let descriptor = self.declare_spec(
            proposal.name,
            proposal.spec,
            Layer::Astral,
            ConstraintSource::SelfReflection,
        )?;
        // The survivor that satisfies the new constraint must stay in the
        // next domain.
        if let Some(witness) = witness {
            self.experience.remember(witness);
        }
        info!(constraint = %descriptor.name, key = %proposal.key, "reflection synthesised constraint");
        Ok(Some((descriptor, proposal.key)))
    }

    /// Synthesise a new vocabulary key and persist it if a substrate is
    /// attached.
    ///
    /// Only observed keys are composed. Expansion keys that reached state
    /// or experience through survivors are left out.
    pub fn perturb(&mut self) -> ChrysalisResult<String> {
        let mut keys = Vocabulary::extract(
            self.binder.state(),
            &self.experience,
            &VocabularyExpansions::new(),
        )
        .key_set();
        keys.retain(|k| !self.expansions.contains(k));

        let key = self.perturbator.perturb(&keys, &mut self.expansions)?;
        self.binder.persist(&self.snapshot());
        Ok(key)
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> &Candidate {
        self.binder.state()
    }

    pub fn cycle_count(&self) -> u64 {
        self.binder.cycle_count()
    }

    pub fn expansions(&self) -> &VocabularyExpansions {
        &self.expansions
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn last_trace(&self) -> Option<&CrystallizationTrace> {
        self.last_trace.as_ref()
    }

    pub fn birth(&self) -> DateTime<Utc> {
        self.birth
    }

    pub fn config(&self) -> &ChrysalisConfig {
        &self.config
    }

    /// Location of the attached substrate, if any.
    pub fn substrate(&self) -> Option<String> {
        self.binder.store().map(|s| s.location())
    }
}

impl Default for Chrysalis {
    fn default() -> Self {
        Self::new()
    }
}
