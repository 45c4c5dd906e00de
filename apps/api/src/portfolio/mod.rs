// Portfolio generation: resume PDF → LLM → index.html / style.css / script.js → zip.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod extract;
pub mod handlers;
pub mod linker;
pub mod packager;
pub mod parser;
pub mod pipeline;
pub mod prompts;
