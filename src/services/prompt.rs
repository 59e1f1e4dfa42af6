//! Prompt Builder
//!
//! Builds the text sent to the model for each kind of request.

use crate::models::{GenerationRequest, GuidanceTopic};

const JSON_RESPONSE_FORMAT: &str = r#"Return your response in the following JSON format:
{
  "explanation": "A clear explanation of the generated code and how it satisfies the request",
  "code": "The full generated code",
  "language": "The programming language of the code (e.g., python, javascript, java)"
}"#;

fn join_docs(docs: &[String]) -> String {
    docs.join("\n\n")
}

/// Prompt asking for code as a JSON `{explanation, code, language}` object.
pub fn code_generation_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::from(
        "Use the following documentation as context to generate code that satisfies the user's request:\n\n",
    );
    prompt.push_str(&join_docs(&request.context_docs));
    prompt.push_str("\n\n");

    if let Some(repo) = &request.repo_context {
        prompt.push_str(&format!("Also consider this repository context: {}\n\n", repo));
    }

    prompt.push_str(&format!("User request: {}\n\n", request.user_query));
    prompt.push_str(
        "Generate detailed, working code that fulfills the request. Include comments to explain key parts.\n",
    );
    prompt.push_str(JSON_RESPONSE_FORMAT);
    prompt
}

/// Prompt asking for a plain-text answer grounded in `docs`.
pub fn chat_prompt(question: &str, docs: &[String]) -> String {
    format!(
        "Use the following documentation as context to answer the user's question:\n\n\
         {}\n\n\
         User question: {}\n\n\
         Provide a clear and concise answer based on the context provided. \
         If the context doesn't contain relevant information, provide your best response based on general knowledge.",
        join_docs(docs),
        question
    )
}

/// The question put to the model for a guidance topic.
pub fn guidance_question(topic: GuidanceTopic, input: &str) -> String {
    match topic {
        GuidanceTopic::Chat => input.to_string(),
        GuidanceTopic::Idea => format!(
            "I'm looking to brainstorm and generate functional requirements for this idea:\n\
             {}\n\n\
             Please provide:\n\
             1. A brief overview of the concept\n\
             2. Potential user stories\n\
             3. High-level functional requirements\n\
             4. Technical considerations\n\
             5. Next steps for implementation",
            input
        ),
        GuidanceTopic::Design => format!(
            "I need design guidance for the following UI/UX requirement:\n\
             {}\n\n\
             Please provide:\n\
             1. A description of the appropriate UI components\n\
             2. Suggested layout structure\n\
             3. Recommended color scheme and styling\n\
             4. Accessibility considerations\n\
             5. Tailwind CSS and shadcn/ui implementation suggestions",
            input
        ),
        GuidanceTopic::Deploy => format!(
            "I need deployment guidance for the following:\n\
             {}\n\n\
             Please provide:\n\
             1. Recommended deployment steps\n\
             2. Configuration and environment setup\n\
             3. Best practices for CI/CD\n\
             4. Troubleshooting tips for common deployment issues\n\
             5. Post-deployment monitoring recommendations",
            input
        ),
    }
}
