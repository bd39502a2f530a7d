//! Prompt templates for every generation call site.

use crate::templates::PromptTemplate;

pub const AUDIENCE: PromptTemplate = PromptTemplate::new(
    "audience",
    "You are an expert marketer. Given this campaign brief, generate 3-5 distinct audience segments.\n\
     BRIEF: {{ intent_brief }}\n\n\
     IMPORTANT: Return your answer as a single, comma-separated list. Do not use newlines or bullet points.\n\
     EXAMPLE: Tech-savvy millennials, Small business owners, Remote workers, Fitness enthusiasts",
);

pub const GROUNDED_AUDIENCE: PromptTemplate = PromptTemplate::new(
    "grounded_audience",
    "You are an expert marketer with access to real customer data. Given this campaign brief, \
     generate 3-5 distinct audience segments.\n\
     BRIEF: {{ intent_brief }}\n\n\
     CUSTOMER DATA (table {{ table }}):\n\
     Columns: {{ schema }}\n\
     Products customers own: {{ products }}\n\
     Customer locations: {{ locations }}\n\
     Observed behaviors: {{ behaviors }}\n\n\
     Every segment MUST reference at least one of the actual values listed above. \
     Do not invent products, locations or behaviors that are not in the data.\n\
     IMPORTANT: Return your answer as a single, comma-separated list. Do not use newlines or bullet points.",
);

pub const CHANNEL: PromptTemplate = PromptTemplate::new(
    "channel",
    "You are a marketing channel strategist. Decide the best delivery channel for this audience.\n\
     BRIEF: {{ intent_brief }}\n\
     TARGET AUDIENCE: {{ audience_segment }}\n\n\
     Answer with exactly one word: email or banner.",
);

pub const EMAIL: PromptTemplate = PromptTemplate::new(
    "email",
    "You are a creative email copywriter. Write a marketing email for the campaign brief and the \
     specific target audience below.\n\
     BRIEF: {{ intent_brief }}\n\
     TARGET AUDIENCE: {{ audience_segment }}\n\n\
     Return only the HTML body of the email. All styling MUST be inline style attributes on the \
     elements. Do NOT include a <style> block, a <link> tag or any external stylesheet.",
);

pub const BANNER: PromptTemplate = PromptTemplate::new(
    "banner",
    "You are a creative designer writing a digital display banner for the campaign brief and the \
     specific target audience below.\n\
     BRIEF: {{ intent_brief }}\n\
     TARGET AUDIENCE: {{ audience_segment }}\n\n\
     Return the banner as HTML. You may include one <style> block with the banner's CSS.",
);

pub const ORCHESTRATOR: PromptTemplate = PromptTemplate::new(
    "orchestrator",
    "You are a campaign orchestration agent. Analyze the campaign brief and determine next steps.\n\
     Current Campaign State:\n\
     - Brief: {{ intent_brief }}\n\
     - Audience Segments: {{ audience_segments }}\n\
     - Content Generated: {{ has_content }}\n\
     - Review Task: {{ has_review }}\n\n\
     Determine the next step needed:\n\
     - If no audience segments exist, return 'generate_audience'\n\
     - If segments exist but not every segment has content, return 'generate_content'\n\
     - If content exists but no review, return 'create_review'\n\
     - If all steps are complete, return 'complete'\n\n\
     Return ONLY ONE of these exact words.",
);

/// Every template the workflow sends, registered once in the prompt engine.
pub const ALL: [PromptTemplate; 6] = [
    AUDIENCE,
    GROUNDED_AUDIENCE,
    CHANNEL,
    EMAIL,
    BANNER,
    ORCHESTRATOR,
];
