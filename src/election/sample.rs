//! Canned campus elections for demos and smoke tests.

use serde::Serialize;
use std::sync::Arc;
use crate::election::election::Election;
use crate::election::manager::ElectionManager;
use crate::utils::Result;

struct Template {
    name: &'static str,
    candidates: &'static [(&'static str, &'static str, &'static str, &'static str)],
}

static TEMPLATES: [Template; 5] = [
    Template {
        name: "University Student Council Election 2025",
        candidates: &[
            ("C001", "Sarah Johnson", "Progressive Student Alliance", "Mental health support, campus sustainability and affordable housing"),
            ("C002", "Michael Chen", "Academic Excellence Party", "Study resources, research funding and career development"),
            ("C003", "Aisha Patel", "Diversity & Inclusion Coalition", "Equal opportunities, cultural events and international student support"),
            ("C004", "James Rodriguez", "Sports & Wellness Movement", "Athletic facilities, wellness programs and recreation"),
            ("C005", "Emily Thompson", "Independent", "Non-partisan student advocacy and transparent governance"),
        ],
    },
    Template {
        name: "Computer Science Department Head Election 2025",
        candidates: &[
            ("D001", "Dr. Alan Turing", "Innovation & Research Party", "AI and quantum computing research, research grants"),
            ("D002", "Dr. Grace Hopper", "Software Engineering Alliance", "Industry partnerships and internship programs"),
            ("D003", "Dr. Donald Knuth", "Academic Excellence Society", "Theoretical foundations and academic publishing"),
        ],
    },
    Template {
        name: "Campus President Election 2025",
        candidates: &[
            ("P001", "Jennifer Martinez", "Unity Coalition", "Campus-wide collaboration between departments"),
            ("P002", "David Thompson", "Reform Party", "Administrative efficiency and transparency"),
            ("P003", "Sophia Lee", "Progressive Movement", "Environmental sustainability and social justice"),
            ("P004", "Robert Kim", "Traditional Values Party", "Academic traditions alongside necessary innovation"),
        ],
    },
    Template {
        name: "Graduate Student Representative Election 2025",
        candidates: &[
            ("G001", "Maya Patel", "Graduate Advocacy Group", "Stipends, healthcare and work-life balance"),
            ("G002", "Alex Johnson", "Research Excellence Party", "Research facilities and conference funding"),
            ("G003", "Chris Anderson", "Independent Graduate Voice", "Non-partisan representation of student welfare"),
        ],
    },
    Template {
        name: "Faculty Senate Chair Election 2025",
        candidates: &[
            ("F001", "Prof. Elizabeth Warren", "Faculty First Coalition", "Faculty rights, tenure protection and academic freedom"),
            ("F002", "Prof. James Foster", "Collaborative Leadership Party", "Interdisciplinary research and administrative cooperation"),
            ("F003", "Prof. Maria Garcia", "Innovation in Education Group", "Teaching methods informed by pedagogy research"),
        ],
    },
];

static VOTERS: [(&str, &str); 20] = [
    ("V001", "Alice Williams"),
    ("V002", "Bob Martinez"),
    ("V003", "Charlie Brown"),
    ("V004", "Diana Prince"),
    ("V005", "Ethan Hunt"),
    ("V006", "Fiona Chen"),
    ("V007", "George Kumar"),
    ("V008", "Hannah Lee"),
    ("V009", "Ian Smith"),
    ("V010", "Julia Anderson"),
    ("V011", "Kevin Nguyen"),
    ("V012", "Laura Garcia"),
    ("V013", "Marcus Johnson"),
    ("V014", "Nina Patel"),
    ("V015", "Oliver Davis"),
    ("V016", "Priya Sharma"),
    ("V017", "Quinn Wilson"),
    ("V018", "Rachel Kim"),
    ("V019", "Samuel Lee"),
    ("V020", "Tina Zhang"),
];

#[derive(Debug, Clone, Serialize)]
pub struct VoterCredential {
    pub voter_id: String,
    pub name: String,
    pub private_key: String,
}

pub struct SampleElection {
    pub election: Arc<Election>,
    pub credentials: Vec<VoterCredential>,
}

fn email_for(name: &str) -> String {
    format!("{}@university.edu", name.to_lowercase().replace(' ', "."))
}

impl ElectionManager {
    /// Create the next template election (cycling through the five) with its
    /// candidates and twenty voters. The new election becomes current and is
    /// left in `created`.
    pub fn create_sample_data(&self) -> Result<SampleElection> {
        let template = &TEMPLATES[self.len() % TEMPLATES.len()];
        let election = self.create_election(template.name, None)?;
        for (id, name, party, description) in template.candidates {
            election.register_candidate(id, name, party, description)?;
        }
        let mut credentials = Vec::with_capacity(VOTERS.len());
        for &(id, name) in VOTERS.iter() {
            let secret = election.register_voter(id, name, &email_for(name))?;
            credentials.push(VoterCredential {
                voter_id: id.to_string(),
                name: name.to_string(),
                private_key: secret.to_hex(),
            });
        }
        Ok(SampleElection { election, credentials })
    }
}
