//! Sample content for development databases.

use promptlib_core::identity::user_id_for_email;
use promptlib_core::{Category, Department, PromptStatus, UserUpsert};
use tracing::{info, warn};

use crate::database::Database;
use crate::error::Result;
use crate::models::NewPrompt;

/// Email of the user that owns seeded prompts.
pub const SEED_USER_EMAIL: &str = "admin@promptlib.local";

const SEED_USER_NAME: &str = "Admin User";

struct SamplePrompt {
    title: &'static str,
    description: &'static str,
    department: Department,
    category: Category,
    prompt: &'static str,
}

const SAMPLES: &[SamplePrompt] = &[
    SamplePrompt {
        title: "Meeting minutes generator",
        description: "Transform rough notes into structured meeting minutes with action items and key decisions",
        department: Department::ProjectManagement,
        category: Category::Documentation,
        prompt: "Please help me transform my rough meeting notes into structured meeting minutes.

Format the minutes with the following sections:
- Meeting title, date, and attendees
- Agenda items discussed
- Key decisions made
- Action items (with assignee and due date)
- Next steps and follow-ups

My rough notes are as follows:
[PASTE YOUR NOTES HERE]",
    },
    SamplePrompt {
        title: "Project status report",
        description: "Generate a comprehensive project status report with progress, risks, and next steps",
        department: Department::ProjectManagement,
        category: Category::Reporting,
        prompt: "Please help me create a professional project status report for [PROJECT NAME].

Include the following sections:
1. Executive Summary (brief overview of project status)
2. Key Accomplishments (what was completed since last report)
3. Current Status (on track, at risk, or behind schedule)
4. Upcoming Milestones (with target dates)
5. Risks and Issues (current challenges and mitigation plans)
6. Resource Updates (any changes to team or budget)
7. Next Steps

Project details:
[PROVIDE KEY PROJECT DETAILS HERE]",
    },
    SamplePrompt {
        title: "Email response templates",
        description: "Create professional email responses for common project management scenarios",
        department: Department::ProjectManagement,
        category: Category::Email,
        prompt: "Please help me draft a professional email response for the following project management scenario:

Scenario: [DESCRIBE THE SCENARIO - e.g., \"A stakeholder is requesting a scope change that would impact the timeline\"]

I need a response that is:
- Professional and courteous
- Clear about the implications
- Offers potential solutions
- Maintains good stakeholder relationships

Additional context:
[ADD ANY SPECIFIC DETAILS ABOUT YOUR SITUATION]",
    },
    SamplePrompt {
        title: "Risk assessment matrix",
        description: "Create a structured risk assessment with probability, impact, and mitigation strategies",
        department: Department::ProjectManagement,
        category: Category::Planning,
        prompt: "Please help me create a comprehensive risk assessment matrix for my project.

For each risk I identify, help me structure the following information:
1. Risk description
2. Probability (Low/Medium/High)
3. Impact (Low/Medium/High)
4. Risk score (Probability x Impact)
5. Mitigation strategy
6. Contingency plan
7. Risk owner

The risks I've identified are:
[LIST YOUR RISKS HERE]",
    },
    SamplePrompt {
        title: "Marketing campaign brief",
        description: "Generate a comprehensive marketing campaign brief with objectives, target audience, and strategies",
        department: Department::Marketing,
        category: Category::Planning,
        prompt: "Please help me create a detailed marketing campaign brief for [CAMPAIGN NAME].

Include the following sections:
1. Campaign Overview and Objectives
2. Target Audience (demographics, psychographics, behaviors)
3. Key Messages and Value Propositions
4. Channel Strategy (social media, email, paid ads, etc.)
5. Budget Allocation
6. Timeline and Milestones
7. Success Metrics and KPIs
8. Creative Requirements

Campaign details:
[PROVIDE CAMPAIGN CONTEXT AND GOALS HERE]",
    },
    SamplePrompt {
        title: "Sales outreach email",
        description: "Craft compelling sales outreach emails that generate responses and build relationships",
        department: Department::Sales,
        category: Category::Email,
        prompt: "Please help me write a personalized sales outreach email for [PROSPECT NAME] at [COMPANY NAME].

The email should:
1. Have a compelling subject line
2. Open with personalized context about their company/role
3. Clearly state the value proposition
4. Include a specific call to action
5. Be concise and professional

Prospect information:
- Company: [COMPANY NAME]
- Role: [PROSPECT TITLE]
- Pain point/opportunity: [DESCRIBE WHAT YOU'VE RESEARCHED]
- Our solution: [HOW WE CAN HELP]",
    },
    SamplePrompt {
        title: "Code documentation template",
        description: "Generate comprehensive documentation for software projects and APIs",
        department: Department::Engineering,
        category: Category::Documentation,
        prompt: "Please help me create documentation for [PROJECT/API NAME].

Include the following sections:
1. Overview and Purpose
2. Installation/Setup Instructions
3. API Endpoints (if applicable)
4. Usage Examples
5. Configuration Options
6. Error Handling
7. Contributing Guidelines
8. License Information

Project details:
- Technology stack: [LIST TECHNOLOGIES]
- Main functionality: [DESCRIBE CORE FEATURES]
- Target audience: [WHO WILL USE THIS]",
    },
];

/// Number of bundled sample prompts.
pub fn sample_count() -> usize {
    SAMPLES.len()
}

/// Insert the bundled sample prompts, owned by the seed user and approved.
///
/// A sample that fails to insert is logged and skipped. Returns the number
/// created.
pub fn seed_samples(db: &Database) -> Result<usize> {
    let user = UserUpsert {
        id: user_id_for_email(SEED_USER_EMAIL),
        email: SEED_USER_EMAIL.to_string(),
        name: SEED_USER_NAME.to_string(),
        image: None,
    };
    db.upsert_user(&user)?;

    let mut created = 0;
    for sample in SAMPLES {
        let new_prompt = NewPrompt {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            department: sample.department,
            category: sample.category,
            prompt: sample.prompt.to_string(),
            creator_id: user.id.clone(),
        };

        let result = db
            .create_prompt(new_prompt)
            .and_then(|prompt| db.moderate_prompt(prompt.id, PromptStatus::Approved));

        match result {
            Ok(_) => created += 1,
            Err(e) => warn!(title = sample.title, error = %e, "Failed to seed prompt"),
        }
    }

    info!(created, "Seeded sample prompts");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptFilter;

    #[test]
    fn test_seed_creates_approved_prompts() {
        let db = Database::in_memory().unwrap();

        let created = seed_samples(&db).unwrap();
        assert_eq!(created, sample_count());

        let approved = db.list_prompts(&PromptFilter::approved()).unwrap();
        assert_eq!(approved.len(), sample_count());

        let owner = db.get_user_by_email(SEED_USER_EMAIL).unwrap().unwrap();
        assert!(approved.iter().all(|p| p.creator_id == owner.id));
    }

    #[test]
    fn test_seed_counts_by_department() {
        let db = Database::in_memory().unwrap();
        seed_samples(&db).unwrap();

        let counts = db.count_approved_by_department().unwrap();
        assert_eq!(counts[&Department::ProjectManagement], 4);
        assert_eq!(counts[&Department::Marketing], 1);
        assert_eq!(counts[&Department::Sales], 1);
        assert_eq!(counts[&Department::Engineering], 1);
        assert!(!counts.contains_key(&Department::Finance));
    }
}
