use std::collections::HashMap;

use super::models::{Lead, Stargazer, StarredUser};

const COMPANY_POINTS: u32 = 3;
const ORG_POINTS: u32 = 2;
const EMAIL_POINTS: u32 = 2;
const EXTRA_REPO_POINTS: u32 = 3;
const MANY_FOLLOWERS: u32 = 100;
const SOME_FOLLOWERS: u32 = 10;

/// Collapses stargazers seen on several repos into one entry per username.
/// First-seen order and the first record are kept; later repos are appended.
pub fn dedupe_stargazers(stargazers: Vec<Stargazer>) -> Vec<StarredUser> {
    let mut users: Vec<StarredUser> = Vec::new();
    let mut by_username: HashMap<String, usize> = HashMap::new();

    for stargazer in stargazers {
        match by_username.get(&stargazer.username) {
            Some(&idx) => {
                let repos = &mut users[idx].repos_starred;
                if !repos.contains(&stargazer.repo) {
                    repos.push(stargazer.repo);
                }
            }
            None => {
                by_username.insert(stargazer.username.clone(), users.len());
                users.push(StarredUser {
                    repos_starred: vec![stargazer.repo.clone()],
                    stargazer,
                });
            }
        }
    }

    users
}

pub fn lead_score(lead: &Lead) -> u32 {
    let mut score = 0;

    if !lead.company_clean.is_empty() {
        score += COMPANY_POINTS;
    }

    if lead.org_count > 0 {
        score += ORG_POINTS;
    }

    if lead
        .details
        .email
        .as_deref()
        .is_some_and(|email| !email.is_empty())
    {
        score += EMAIL_POINTS;
    }

    let extra_repos = lead.repos_starred.len().saturating_sub(1) as u32;
    score += extra_repos * EXTRA_REPO_POINTS;

    match lead.details.followers.unwrap_or(0) {
        f if f > MANY_FOLLOWERS => score += 2,
        f if f > SOME_FOLLOWERS => score += 1,
        _ => {}
    }

    score
}

/// Scores every lead and orders them best first. Equal scores keep their input order.
pub fn score_leads(mut leads: Vec<Lead>) -> Vec<Lead> {
    for lead in &mut leads {
        lead.score = lead_score(lead);
    }
    leads.sort_by(|a, b| b.score.cmp(&a.score));
    leads
}
