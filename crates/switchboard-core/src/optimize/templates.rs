//! Prompt templates for the optimizer, keyed by `<family>/<variant>`.

/// A system message plus a user message with `{{placeholders}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

pub const ORIGINAL_PROMPT: &str = "{{original_prompt}}";
pub const OPTIMIZED_PROMPT: &str = "{{optimized_prompt}}";
pub const FEEDBACK: &str = "{{feedback}}";

const KEEP_AND_OUTPUT: &str = "\
Keep placeholder variables such as {{variable}} exactly as written.

Output only the complete improved prompt, without explanations or commentary.";

pub const TEMPLATES: [Template; 6] = [
    Template {
        id: "optimize/general",
        system: concat!(
            "You are a prompt engineering expert. Rewrite the system prompt you are given so that it is ",
            "better structured, more explicit and more effective.\n\n",
            "Guidelines:\n",
            "1. Define the assistant's role, identity and domain clearly.\n",
            "2. Organize the prompt with headings, lists and separators.\n",
            "3. State what the assistant must and must not do.\n",
            "4. Specify the expected output format and tone.\n",
            "5. Add input/output examples where they help.\n",
            "6. Preserve the original intent; improve, do not replace.\n",
            "7. Stay concise and avoid needless complexity.\n",
        ),
        user: "Improve the following system prompt:\n\n{{original_prompt}}",
    },
    Template {
        id: "optimize/academic",
        system: concat!(
            "You are a prompt engineering expert for academic writing and rigorous reasoning. Rewrite the ",
            "system prompt you are given to an academic standard.\n\n",
            "Guidelines:\n",
            "1. Use precise, domain-appropriate terminology.\n",
            "2. Keep every instruction logically consistent.\n",
            "3. Use numbered, hierarchical structure.\n",
            "4. Ask the assistant to cite sources or justify claims where relevant.\n",
            "5. Encourage objective, multi-perspective analysis.\n",
            "6. Bound the scope and depth of answers explicitly.\n",
            "7. Preserve the original intent.\n",
        ),
        user: "Improve the following system prompt in a rigorous academic style:\n\n{{original_prompt}}",
    },
    Template {
        id: "optimize/creative",
        system: concat!(
            "You are a prompt engineering expert for creative writing and open-ended conversation. Rewrite ",
            "the system prompt you are given to be more imaginative and expressive.\n\n",
            "Guidelines:\n",
            "1. Use vivid language and metaphor.\n",
            "2. Leave the assistant room for creative freedom.\n",
            "3. Add emotional and personal touches.\n",
            "4. Build rich context and scenes.\n",
            "5. Welcome varied output forms.\n",
            "6. Never drift from the original goal.\n",
            "7. Make the prompt itself engaging to read.\n",
        ),
        user: "Improve the following system prompt in a creative, open style:\n\n{{original_prompt}}",
    },
    Template {
        id: "user-optimize/general",
        system: concat!(
            "You are an expert at refining the prompts users send to an AI assistant. Rewrite the user ",
            "prompt you are given so that its intent is clearer and its information more complete.\n\n",
            "Guidelines:\n",
            "1. Make the user's actual goal explicit.\n",
            "2. Add the background and constraints the request needs.\n",
            "3. Turn vague wording into concrete, actionable requests.\n",
            "4. Break complex requests into points or steps.\n",
            "5. Remove ambiguity.\n",
            "6. Keep a natural conversational tone.\n",
            "7. Do not pad the prompt with unnecessary detail.\n",
        ),
        user: "Improve the following user prompt:\n\n{{original_prompt}}",
    },
    Template {
        id: "iterate/refine",
        system: concat!(
            "You refine prompts iteratively. Improve the prompt you are given according to the user's ",
            "feedback.\n\n",
            "Guidelines:\n",
            "1. Change only what the feedback asks for.\n",
            "2. Keep the parts that already work.\n",
            "3. Focus each iteration on one aspect.\n",
            "4. Blend the requested direction naturally into the prompt.\n",
            "5. Keep the overall style and logic consistent.\n",
        ),
        user: "Current prompt:\n{{optimized_prompt}}\n\nFeedback and direction:\n{{feedback}}\n\nImprove the prompt according to this feedback.",
    },
    Template {
        id: "evaluate/analyze",
        system: "\
You evaluate prompt quality. Score the prompt you are given from 1 to 10 on each dimension:

1. **Clarity**: are the instructions explicit and unambiguous?
2. **Completeness**: is all necessary information and every constraint present?
3. **Structure**: is it well organized?
4. **Effectiveness**: will it reliably lead to the desired output?
5. **Concision**: is it free of redundancy?

Answer with this report:

## Prompt evaluation

### Total: X/50

### Scores
- Clarity: X/10
- Completeness: X/10
- Structure: X/10
- Effectiveness: X/10
- Concision: X/10

### Strengths
- ...

### Suggestions
1. ...
2. ...
3. ...

### Direction
...",
        user: "Evaluate the following prompt:\n\n{{original_prompt}}",
    },
];

pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

impl Template {
    /// The system message, with the shared closing rules for rewriting templates
    pub fn system_message(&self) -> String {
        if self.id.starts_with("evaluate/") {
            self.system.to_string()
        } else {
            format!("{}\n{}", self.system, KEEP_AND_OUTPUT)
        }
    }

    /// Fill the user message. Placeholders without a value stay as written.
    pub fn user_message(
        &self,
        original: &str,
        optimized: Option<&str>,
        feedback: Option<&str>,
    ) -> String {
        let mut message = self.user.replacen(ORIGINAL_PROMPT, original, 1);
        if let Some(optimized) = optimized.filter(|value| !value.is_empty()) {
            message = message.replacen(OPTIMIZED_PROMPT, optimized, 1);
        }
        if let Some(feedback) = feedback.filter(|value| !value.is_empty()) {
            message = message.replacen(FEEDBACK, feedback, 1);
        }
        message
    }
}
