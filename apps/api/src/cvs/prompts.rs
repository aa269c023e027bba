// Prompt constants for CV tailoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for CV tailoring. `{json_only}` is filled at call time.
pub const CV_TAILOR_SYSTEM: &str = "You are an expert resume writer and career coach. \
    You rewrite a candidate's resume material into a concise one-to-two page CV \
    tailored to a specific job description. {json_only}";

/// User prompt template. Replace `{grounding_instruction}`, `{job_description}`
/// and `{profile_json}` before sending.
pub const CV_TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the candidate's CV to the job description below.

{grounding_instruction}

Return a JSON object with this EXACT schema (omit nothing, use [] or null when empty):
{
  "fullName": "Jane Doe",
  "title": "Senior Backend Engineer",
  "contact": {
    "email": "jane@example.com",
    "phone": "+1 555 0100",
    "location": "Berlin, Germany",
    "links": [{"label": "GitHub", "url": "https://github.com/jane"}]
  },
  "summary": "2-3 sentences aimed at this role.",
  "skills": ["Rust", "PostgreSQL"],
  "experiences": [
    {
      "company": "Acme",
      "position": "Backend Engineer",
      "startDate": "2021-03",
      "endDate": "Present",
      "highlights": ["Action-verb bullet with a concrete result"]
    }
  ],
  "education": [
    {"institution": "TU Berlin", "degree": "MSc Computer Science", "startDate": "2016", "endDate": "2018", "description": null}
  ],
  "projects": [
    {"name": "Project", "description": "One line on what it does", "technologies": ["Rust"]}
  ],
  "activities": [{"name": "Activity", "description": null}],
  "volunteering": [
    {"organization": "Org", "role": "Mentor", "startDate": null, "endDate": null, "description": null}
  ]
}

Rules:
- Order skills and experience highlights by relevance to the job description.
- 2-5 highlights per experience; each fits on at most two lines.
- Mirror the job description's terminology where the profile supports it.
- Drop projects, activities and volunteering that are irrelevant to the role.

JOB DESCRIPTION:
{job_description}

CANDIDATE PROFILE (JSON):
{profile_json}
"#;
