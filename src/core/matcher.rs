use crate::core::validation::{validate_match_input, MatchingError};
use crate::models::{
    EvictionPolicy, MatchOutcome, MatchPolicy, MentorLoad, Proposal, ProposalResult,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{debug, info};

/// Raw inputs of one matching run
///
/// Preference lists are keyed by participant id. A student without an entry
/// has an empty list; every mentor needs a capacity.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub student_ids: &'a [String],
    pub mentor_ids: &'a [String],
    pub student_prefs: &'a BTreeMap<String, Vec<String>>,
    pub mentor_prefs: &'a BTreeMap<String, Vec<String>>,
    pub capacities: &'a BTreeMap<String, u32>,
}

impl<'a> MatchInput<'a> {
    pub fn new(
        student_ids: &'a [String],
        mentor_ids: &'a [String],
        student_prefs: &'a BTreeMap<String, Vec<String>>,
        mentor_prefs: &'a BTreeMap<String, Vec<String>>,
        capacities: &'a BTreeMap<String, u32>,
    ) -> Self {
        Self {
            student_ids,
            mentor_ids,
            student_prefs,
            mentor_prefs,
            capacities,
        }
    }
}

/// Capacitated deferred acceptance with students proposing
///
/// # Loop
/// 1. Free students wait in a FIFO queue, initially every student with a
///    non-empty list, in input order.
/// 2. A popped student proposes to the next untried mentor on their list; the
///    cursor advances whatever the answer, so no pair is proposed twice.
/// 3. A mentor only ever holds students from its own ranking. With a free
///    seat it accepts; when full it may displace a worse-ranked holder as
///    chosen by the [`EvictionPolicy`].
/// 4. Displaced and rejected students rejoin the queue while they still have
///    untried mentors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredAcceptance {
    policy: MatchPolicy,
}

impl DeferredAcceptance {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Run the matcher
    ///
    /// Returns an error only for contract violations (see [`MatchingError`]).
    /// With no students or no mentors the proposal loop is skipped.
    pub fn run(&self, input: MatchInput<'_>) -> Result<MatchOutcome, MatchingError> {
        validate_match_input(&input, &self.policy)?;

        if input.student_ids.is_empty() || input.mentor_ids.is_empty() {
            debug!(
                "Nothing to match ({} students, {} mentors)",
                input.student_ids.len(),
                input.mentor_ids.len()
            );
            return Ok(assemble(&input, &vec![Vec::new(); input.mentor_ids.len()], Vec::new()));
        }

        let mentor_index: HashMap<&str, usize> = input
            .mentor_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        let student_index: HashMap<&str, usize> = input
            .student_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Validation guarantees every referenced id is in the index maps
        let student_lists: Vec<Vec<usize>> = input
            .student_ids
            .iter()
            .map(|id| {
                input
                    .student_prefs
                    .get(id)
                    .map(|list| list.iter().filter_map(|m| mentor_index.get(m.as_str()).copied()).collect())
                    .unwrap_or_default()
            })
            .collect();

        let rankings: Vec<HashMap<usize, usize>> = input
            .mentor_ids
            .iter()
            .map(|id| {
                input
                    .mentor_prefs
                    .get(id)
                    .map(|list| {
                        list.iter()
                            .enumerate()
                            .filter_map(|(rank, s)| student_index.get(s.as_str()).map(|&si| (si, rank)))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        let capacities: Vec<usize> = input
            .mentor_ids
            .iter()
            .map(|id| input.capacities.get(id).copied().unwrap_or(0) as usize)
            .collect();

        let mut holders: Vec<Vec<usize>> = vec![Vec::new(); input.mentor_ids.len()];
        let mut cursors = vec![0usize; input.student_ids.len()];
        let mut proposals = Vec::new();

        let mut free: VecDeque<usize> = (0..input.student_ids.len())
            .filter(|&s| !student_lists[s].is_empty())
            .collect();

        while let Some(s) = free.pop_front() {
            let Some(&m) = student_lists[s].get(cursors[s]) else {
                debug!("Student {} exhausted their list", input.student_ids[s]);
                continue;
            };
            cursors[s] += 1;

            let ranking = &rankings[m];
            let result = match ranking.get(&s) {
                None => ProposalResult::Rejected,
                Some(_) if holders[m].len() < capacities[m] => {
                    holders[m].push(s);
                    ProposalResult::Accepted
                }
                Some(&rank) => match self.select_eviction(&holders[m], ranking, rank) {
                    Some(pos) => {
                        let evicted = holders[m].remove(pos);
                        holders[m].push(s);
                        free.push_back(evicted);
                        ProposalResult::Displaced {
                            evicted: input.student_ids[evicted].clone(),
                        }
                    }
                    None => ProposalResult::Rejected,
                },
            };

            debug!(
                "Proposal {} -> {}: {:?}",
                input.student_ids[s], input.mentor_ids[m], result
            );

            if result == ProposalResult::Rejected && cursors[s] < student_lists[s].len() {
                free.push_back(s);
            }

            proposals.push(Proposal {
                student_id: input.student_ids[s].clone(),
                mentor_id: input.mentor_ids[m].clone(),
                result,
            });
        }

        let outcome = assemble(&input, &holders, proposals);

        info!(
            "Matched {} of {} students to {} mentors in {} proposals",
            outcome.assignment.len(),
            input.student_ids.len(),
            input.mentor_ids.len(),
            outcome.proposals.len()
        );

        Ok(outcome)
    }

    /// Position of the holder to give up for a challenger of rank `challenger`
    ///
    /// A holder absent from the ranking counts as worse than every ranked student.
    fn select_eviction(
        &self,
        holders: &[usize],
        ranking: &HashMap<usize, usize>,
        challenger: usize,
    ) -> Option<usize> {
        let rank_of = |h: usize| ranking.get(&h).copied().unwrap_or(usize::MAX);

        match self.policy.eviction {
            EvictionPolicy::FirstDisplaceable => holders.iter().position(|&h| challenger < rank_of(h)),
            EvictionPolicy::WeakestHolder => holders
                .iter()
                .enumerate()
                .max_by_key(|(_, h)| rank_of(**h))
                .filter(|(_, h)| challenger < rank_of(**h))
                .map(|(pos, _)| pos),
        }
    }
}

/// Match with the default policy
///
/// Convenience wrapper around [`DeferredAcceptance::run`].
pub fn match_students(
    student_ids: &[String],
    mentor_ids: &[String],
    student_prefs: &BTreeMap<String, Vec<String>>,
    mentor_prefs: &BTreeMap<String, Vec<String>>,
    capacities: &BTreeMap<String, u32>,
) -> Result<MatchOutcome, MatchingError> {
    DeferredAcceptance::default().run(MatchInput::new(
        student_ids,
        mentor_ids,
        student_prefs,
        mentor_prefs,
        capacities,
    ))
}

fn assemble(input: &MatchInput<'_>, holders: &[Vec<usize>], proposals: Vec<Proposal>) -> MatchOutcome {
    let mut assignment = BTreeMap::new();
    let mut mentor_loads = Vec::with_capacity(input.mentor_ids.len());

    for (m, mentor_id) in input.mentor_ids.iter().enumerate() {
        let students: Vec<String> = holders[m]
            .iter()
            .map(|&s| input.student_ids[s].clone())
            .collect();
        for student_id in &students {
            assignment.insert(student_id.clone(), mentor_id.clone());
        }
        mentor_loads.push(MentorLoad {
            mentor_id: mentor_id.clone(),
            capacity: input.capacities.get(mentor_id).copied().unwrap_or(0),
            students,
        });
    }

    let unmatched_students = input
        .student_ids
        .iter()
        .filter(|id| !assignment.contains_key(id.as_str()))
        .cloned()
        .collect();

    MatchOutcome {
        assignment,
        unmatched_students,
        mentor_loads,
        proposals,
    }
}
