// ── Reconciliation planning ──
//
// Pure functions that compare a previously applied collection with the
// desired one and say which remote calls are needed. Nothing here talks
// to a backend; the resources execute the plans in order.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::model::AppInstanceSpec;

// ── Set difference ───────────────────────────────────────────────────

/// Membership changes between two unordered id sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDiff {
    /// In desired but not previous, in desired order.
    pub to_add: Vec<String>,
    /// In previous but not desired, in previous order.
    pub to_remove: Vec<String>,
}

impl SetDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `to_remove = previous - desired`, `to_add = desired - previous`.
///
/// Order and duplicates in either input never produce work.
pub fn diff_sets(previous: &[String], desired: &[String]) -> SetDiff {
    let prev: HashSet<&str> = previous.iter().map(String::as_str).collect();
    let want: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let to_add = desired
        .iter()
        .filter(|id| !prev.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let to_remove = previous
        .iter()
        .filter(|id| !want.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect();

    SetDiff { to_add, to_remove }
}

// ── Keyed collections (applications, teams) ──────────────────────────

/// Create / update / delete split for a collection keyed by remote id.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedPlan<T> {
    /// Desired elements without a known remote id.
    pub create: Vec<T>,
    /// Desired elements whose id still exists remotely.
    pub update: Vec<T>,
    /// Remote ids no desired element refers to.
    pub delete: Vec<String>,
}

/// Split `desired` against the ids that currently exist remotely.
///
/// A desired element carrying an id the backend no longer knows is
/// treated as new.
pub fn plan_by_id<T: Clone>(
    existing: &[String],
    desired: &[T],
    id_of: impl Fn(&T) -> Option<&str>,
) -> KeyedPlan<T> {
    let existing_set: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut kept = HashSet::new();
    let mut create = Vec::new();
    let mut update = Vec::new();

    for item in desired {
        match id_of(item) {
            Some(id) if existing_set.contains(id) && kept.insert(id.to_owned()) => {
                update.push(item.clone());
            }
            _ => create.push(item.clone()),
        }
    }

    let delete = existing
        .iter()
        .filter(|id| !kept.contains(id.as_str()))
        .cloned()
        .collect();

    KeyedPlan {
        create,
        update,
        delete,
    }
}

/// Fail when two `items` share a name. Unnamed items are not compared.
pub fn reject_duplicate_names<T>(
    collection: &str,
    items: &[T],
    name_of: impl Fn(&T) -> Option<&str>,
) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for name in items.iter().filter_map(|item| name_of(item)) {
        if !seen.insert(name) {
            return Err(CoreError::DuplicateName {
                collection: collection.to_owned(),
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Give each desired element without an id the id of the previous element
/// with the same name.
///
/// Ids already named explicitly in `desired` are never handed out twice.
/// When `previous` repeats a name, the first element wins.
pub fn adopt_ids<T>(
    collection: &str,
    previous: &[T],
    desired: &mut [T],
    name_of: impl Fn(&T) -> Option<&str>,
    id_of: impl Fn(&T) -> Option<&str>,
    set_id: impl Fn(&mut T, String),
) -> Result<(), CoreError> {
    reject_duplicate_names(collection, desired, &name_of)?;

    let claimed: HashSet<String> = desired
        .iter()
        .filter_map(|item| id_of(item).map(str::to_owned))
        .collect();
    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for item in previous {
        if let (Some(name), Some(id)) = (name_of(item), id_of(item)) {
            if !claimed.contains(id) {
                by_name.entry(name).or_insert(id);
            }
        }
    }

    for item in desired.iter_mut() {
        if id_of(&*item).is_some() {
            continue;
        }
        let found = name_of(&*item)
            .and_then(|name| by_name.get(name))
            .map(|id| (*id).to_owned());
        if let Some(id) = found {
            set_id(item, id);
        }
    }
    Ok(())
}

// ── Application instances ────────────────────────────────────────────

/// Instance changes within one team, matched by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstancePlan {
    /// Remote ids of instances no longer desired.
    pub delete: Vec<String>,
    /// `(remote id, desired instance)` pairs updated in place.
    pub update: Vec<(String, AppInstanceSpec)>,
    /// Desired instances with no remote counterpart.
    pub create: Vec<AppInstanceSpec>,
}

/// Match `desired` instances to `existing` ones by name.
///
/// Names must be unique within `desired`; duplicates are rejected rather
/// than guessed at. Existing instances without a remote id are ignored.
pub fn plan_instances(
    team: &str,
    existing: &[AppInstanceSpec],
    desired: &[AppInstanceSpec],
) -> Result<InstancePlan, CoreError> {
    let mut wanted: HashMap<&str, &AppInstanceSpec> = HashMap::with_capacity(desired.len());
    for inst in desired {
        if wanted.insert(inst.name.as_str(), inst).is_some() {
            return Err(CoreError::DuplicateInstanceName {
                team: team.to_owned(),
                name: inst.name.clone(),
            });
        }
    }

    let mut plan = InstancePlan::default();
    let mut matched: HashSet<&str> = HashSet::new();

    for inst in existing {
        let Some(id) = inst.id.as_deref() else {
            continue;
        };
        match wanted.get(inst.name.as_str()) {
            Some(want) if matched.insert(inst.name.as_str()) => {
                plan.update.push((id.to_owned(), (*want).clone()));
            }
            _ => plan.delete.push(id.to_owned()),
        }
    }

    plan.create = desired
        .iter()
        .filter(|inst| !matched.contains(inst.name.as_str()))
        .cloned()
        .collect();

    Ok(plan)
}
