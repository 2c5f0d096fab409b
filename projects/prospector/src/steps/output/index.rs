use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::steps::leads::models::Lead;

#[derive(Debug, Error)]
pub enum SaveLocalError {
    #[error("CreateDirectory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialize: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("WriteFile {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes `leads` as pretty-printed JSON, replacing any previous file.
pub fn save_local(path: &Path, leads: &[Lead]) -> Result<PathBuf, SaveLocalError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SaveLocalError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(leads)?;
    fs::write(path, json).map_err(|source| SaveLocalError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;

    info!(count = leads.len(), path = %path.display(), "Saved leads");
    Ok(path.to_path_buf())
}

pub fn format_lead_line(lead: &Lead) -> String {
    let company = if lead.company_clean.is_empty() { "-" } else { lead.company_clean.as_str() };
    format!("{:>2} | {:<20} | {:<30}", lead.score, lead.stargazer.username, company)
        .trim_end()
        .to_string()
}

pub fn log_top_leads(leads: &[Lead], top: usize) {
    if top == 0 || leads.is_empty() {
        return;
    }
    info!("Top {} leads by score:", top.min(leads.len()));
    for lead in leads.iter().take(top) {
        info!("  {}", format_lead_line(lead));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::leads::models::{Stargazer, UserDetails};
    use chrono::{TimeZone, Utc};

    fn lead(username: &str, company: &str, score: u32) -> Lead {
        Lead {
            stargazer: Stargazer {
                username: username.to_string(),
                starred_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
                repo: "mixpanel/mixpanel-js".to_string(),
                user_url: format!("https://github.com/{username}"),
            },
            details: UserDetails {
                company: Some(format!("@{company}")),
                followers: Some(12),
                ..UserDetails::default()
            },
            company_clean: company.to_string(),
            orgs: vec!["mixpanel".to_string()],
            org_count: 1,
            repos_starred: vec!["mixpanel/mixpanel-js".to_string()],
            score,
        }
    }

    #[test]
    fn saved_file_uses_flat_record_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/leads.json");

        save_local(&path, &[lead("octo", "acme", 6)]).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = &written[0];
        assert_eq!(record["username"], "octo");
        assert_eq!(record["starred_at"], "2024-05-01T08:30:00Z");
        assert_eq!(record["repo"], "mixpanel/mixpanel-js");
        assert_eq!(record["company"], "@acme");
        assert_eq!(record["company_clean"], "acme");
        assert_eq!(record["email"], serde_json::Value::Null);
        assert_eq!(record["org_count"], 1);
        assert_eq!(record["repos_starred"][0], "mixpanel/mixpanel-js");
        assert_eq!(record["score"], 6);
        assert!(record.get("stargazer").is_none());
    }

    #[test]
    fn lead_line_pads_columns() {
        assert_eq!(format_lead_line(&lead("octo", "acme", 6)), format!(" 6 | {:<20} | acme", "octo"));
        assert!(format_lead_line(&lead("octo", "", 0)).ends_with("| -"));
    }
}
