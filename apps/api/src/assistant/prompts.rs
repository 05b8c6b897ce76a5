// Assistant LLM prompt templates.
// Placeholders in `{braces}` are substituted with `str::replace` before sending.

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze the following resume as an Applicant Tracking System (ATS) and an experienced recruiter would.

TARGET ROLE:
{target_job}

RESUME:
{resume}

Return exactly this JSON structure:
{
  "atsScore": number 0-100 (how well the resume will parse and rank in an ATS),
  "overallScore": number 0-100,
  "strengths": ["string"],
  "weaknesses": ["string"],
  "suggestions": ["specific, actionable improvement"],
  "keywordsFound": ["keyword already present"],
  "missingKeywords": ["keyword expected for the target role but absent"]
}

RULES:
1. Judge only what is written; do not assume unstated experience.
2. Suggestions must be concrete ("Quantify the migration bullet with latency numbers"), never generic.
3. Return ONLY the JSON object."#;

pub const JOB_MATCH_PROMPT: &str = r#"Compare the candidate's resume with the job posting and estimate how well they match.

JOB TITLE: {job_title}
COMPANY: {company}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume}

Return exactly this JSON structure:
{
  "matchScore": number 0-100,
  "skillsMatch": number 0-100,
  "experienceMatch": number 0-100,
  "matchedSkills": ["skill present in both"],
  "missingSkills": ["skill the job asks for that the resume lacks"],
  "recommendations": ["specific next step for this application"]
}

Return ONLY the JSON object."#;

pub const OPTIMIZE_RESUME_PROMPT: &str = r#"Rewrite the resume below so it is tailored to the job posting.

JOB TITLE: {job_title}
COMPANY: {company}

JOB DESCRIPTION:
{job_description}

ORIGINAL RESUME:
{resume}

RULES:
1. Keep every fact truthful: same employers, titles, dates and education.
2. Reorder and rephrase bullets to surface the experience most relevant to this job.
3. Use the job description's terminology where the resume genuinely supports it.
4. Return plain text in a conventional resume layout."#;

pub const COVER_LETTER_PROMPT: &str = r#"Write a cover letter for the position below.

JOB TITLE: {job_title}
COMPANY: {company}
HIRING MANAGER: {hiring_manager}
TONE: {tone}

JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME:
{resume}

RULES:
1. Three to four short paragraphs, under 400 words.
2. Reference two or three concrete achievements from the resume that fit the role.
3. Address the letter to the hiring manager when one is given, otherwise "Dear Hiring Manager".
4. Return only the letter text."#;

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"Generate {count} interview questions for a {level} {role} candidate.
Mix behavioral, technical and situational questions unless the role clearly calls for one kind.

Return exactly this JSON structure:
{
  "questions": [
    {
      "question": "string",
      "category": "behavioral" | "technical" | "situational",
      "difficulty": "easy" | "medium" | "hard",
      "tips": "one sentence on what a strong answer covers"
    }
  ]
}

Return ONLY the JSON object."#;

pub const INTERVIEW_FEEDBACK_PROMPT: &str = r#"You are interviewing a candidate. Evaluate their answer.

QUESTION:
{question}

CANDIDATE ANSWER:
{answer}

Return exactly this JSON structure:
{
  "score": number 0-100,
  "strengths": ["what the answer did well"],
  "improvements": ["what to add or change"],
  "sampleAnswer": "a concise model answer in the STAR format where applicable"
}

Return ONLY the JSON object."#;

pub const COMPANY_INSIGHT_PROMPT: &str = r#"Give a job seeker a briefing on the company "{company}".

Return exactly this JSON structure:
{
  "company": "official company name",
  "overview": "two or three sentences on what the company does",
  "industry": "string",
  "size": "approximate employee count or range",
  "culture": "what working there is reported to be like",
  "interviewTips": ["specific tip for interviewing at this company"],
  "recentNews": ["notable recent development"],
  "glassdoorRating": number 0-5 or null if unknown
}

If you are not confident about a fact, say so instead of guessing.
Return ONLY the JSON object."#;
