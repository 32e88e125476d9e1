//! # Default Task Prompts
//!
//! The role description (sent as the system prompt) and the task template (sent as
//! the user prompt) for every pipeline stage. Placeholders are written as `{name}`
//! and filled in by [`crate::prompts::core::render`].

// --- Schema Analysis ---

pub const SCHEMA_ANALYSIS_SYSTEM_PROMPT: &str = "You are a database expert who analyzes and understands database schemas. Identify tables, columns, relationships, and data types accurately.";

/// Placeholders: `{schema}`
pub const SCHEMA_ANALYSIS_USER_PROMPT: &str = r#"Analyze this database schema and provide a comprehensive understanding of it:

{schema}

Please identify:
1. All tables and their purposes
2. All columns in each table and their data types
3. Primary keys and foreign keys
4. Relationships between tables
5. Any constraints or special considerations

Format your response as a structured analysis that could be used by another agent to generate SQL queries."#;

// --- SQL Generation ---

pub const SQL_GENERATION_SYSTEM_PROMPT: &str = "You are an SQL expert who converts natural language queries into precise SQL commands based on database schemas.";

/// Placeholders: `{schema_analysis}`, `{prompt}`, `{feedback}`
pub const SQL_GENERATION_USER_PROMPT: &str = r#"Based on the following database schema analysis:

{schema_analysis}

Convert this natural language query into a proper SQL command:

"{prompt}"
{feedback}
Provide only the SQL command without any explanation. Make sure the SQL follows best practices and is optimized."#;

// --- SQL Validation ---

pub const SQL_VALIDATION_SYSTEM_PROMPT: &str = "You are a meticulous SQL validator who ensures SQL commands are correct, efficient, and match the user's intent and the database schema.";

/// Placeholders: `{schema_analysis}`, `{prompt}`, `{sql}`
pub const SQL_VALIDATION_USER_PROMPT: &str = r#"You need to validate if this SQL query correctly answers the user's request and is compatible with the database schema.

Database Schema Analysis:
{schema_analysis}

User's Natural Language Query:
"{prompt}"

Generated SQL Query:
```sql
{sql}
```

Please validate the SQL query and provide your assessment in this exact JSON format:
{
    "is_valid": true/false,
    "issues": ["issue1", "issue2", ...] (empty list if no issues),
    "suggested_fix": "fixed SQL query" (only if there are issues),
    "explanation": "brief explanation of issues or confirmation of validity"
}

Return ONLY the JSON without any additional text."#;

// --- Results Preview ---

pub const RESULTS_PREVIEW_SYSTEM_PROMPT: &str = "You are a data analyst who predicts what a SQL query would return against a database, and judges whether those results answer the user's question.";

/// Placeholders: `{schema_analysis}`, `{prompt}`, `{sql}`
pub const RESULTS_PREVIEW_USER_PROMPT: &str = r#"Imagine executing this SQL query against a database with the following schema.

Database Schema Analysis:
{schema_analysis}

User's Natural Language Query:
"{prompt}"

SQL Query:
```sql
{sql}
```

Generate 5-10 rows of plausible sample output that is consistent with the schema, then judge whether that output satisfies the user's request.

Provide your prediction in this exact JSON format:
{
    "columns": ["column1", "column2", ...],
    "data": [["value1", "value2", ...], ...],
    "row_count": number of rows in data,
    "matches_user_intent": true/false,
    "explanation": "why the results do or do not answer the user's request",
    "suggested_improved_query": "a better SQL query" (only if the results do not match the user's intent)
}

Every row in "data" must have exactly one value per column. Return ONLY the JSON without any additional text."#;

// --- Refinement Feedback ---

/// Appended to the generation prompt when regenerating after a failed round.
///
/// Placeholders: `{previous_sql}`, `{explanation}`
pub const REFINEMENT_FEEDBACK_TEMPLATE: &str = r#"
A previous attempt produced this SQL:
```sql
{previous_sql}
```

Its predicted results did not satisfy the request. Reviewer feedback:
{explanation}

Write a new query that addresses this feedback.
"#;
