// Resume ranking pipeline: file intake → text/email extraction → oracle
// scoring → ordered batch result. All LLM calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod oracle;
pub mod orchestrator;
pub mod prompts;
pub mod skills;
pub mod weights;
