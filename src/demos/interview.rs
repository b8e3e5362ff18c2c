//! Interview-preparation graph.
//!
//! `query_a2a` asks a remote leadership agent the user's question over A2A;
//! `generate_advice` hands the answer to a chat model acting as a career
//! coach. Correlation ids returned by the agent are kept in state so a later
//! run can continue the same conversation.

use async_trait::async_trait;
use std::sync::Arc;
use tandem_a2a::{
    A2aResult, AgentCard, CardResolver, ClientConfig, ClientFactory, Message, ResponseSummary,
    process_response,
};
use tandem_core::{ChatMessage, last_ai, last_human};
use tandem_graph::{
    CompiledGraph, END, GraphResult, GraphState, HasMessages, Node, NodeResult, StateGraph,
};
use tandem_llm::{ChatModel, ChatPromptTemplate, LlmResult, init_chat_model};
use tracing::{error, info};

use super::{DemoResult, truncate};
use crate::config::DemoConfig;

pub const QUERY_A2A_NODE: &str = "query_a2a";
pub const GENERATE_ADVICE_NODE: &str = "generate_advice";

/// Reply recorded when the conversation holds no human turn
pub const NO_USER_QUERY: &str = "No user query found";

/// Temperature used for advice generation
pub const ADVICE_TEMPERATURE: f32 = 0.3;

const CAREER_COACH_PROMPT: &str = "You are an expert career coach. Given the following \
information from an AI assistant, provide actionable interviewing advice for a user preparing \
for a leadership interview. Be concise, specific, and practical.";

const PREVIEW_CHARS: usize = 1000;

pub const FIRST_QUERY: &str = "What is melioration in the context of leadership?";
pub const SECOND_QUERY: &str = "What are the elements of the OODA Loop?";
pub const FOLLOW_UP_QUERY: &str = "Under what circumstances is OODA most useful?";

/// Conversation plus what is needed to keep talking to the same agent
#[derive(Debug, Clone, Default)]
pub struct InterviewState {
    pub messages: Vec<ChatMessage>,
    pub agent_card: Option<Arc<AgentCard>>,
    pub task_id: Option<String>,
    pub context_id: Option<String>,
}

impl InterviewState {
    /// Fresh conversation starting with one human question
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::human(query)],
            ..Default::default()
        }
    }

    /// Reuse a known agent card
    pub fn with_agent_card(mut self, card: Option<Arc<AgentCard>>) -> Self {
        self.agent_card = card;
        self
    }

    /// Continue an earlier exchange
    pub fn with_correlation(mut self, task_id: Option<String>, context_id: Option<String>) -> Self {
        self.task_id = task_id;
        self.context_id = context_id;
        self
    }
}

/// Task and context ids reported by the remote agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationIds {
    pub task_id: Option<String>,
    pub context_id: Option<String>,
}

/// Partial update produced by the interview nodes
#[derive(Debug, Default)]
pub struct InterviewUpdate {
    pub messages: Vec<ChatMessage>,
    pub agent_card: Option<Arc<AgentCard>>,
    /// Replaces both ids when present
    pub ids: Option<CorrelationIds>,
}

impl InterviewUpdate {
    fn message(message: ChatMessage) -> Self {
        Self {
            messages: vec![message],
            ..Default::default()
        }
    }
}

impl GraphState for InterviewState {
    type Update = InterviewUpdate;

    fn apply(&mut self, update: InterviewUpdate) {
        tandem_graph::add_messages(&mut self.messages, update.messages);
        if let Some(card) = update.agent_card {
            self.agent_card = Some(card);
        }
        if let Some(ids) = update.ids {
            self.task_id = ids.task_id;
            self.context_id = ids.context_id;
        }
    }
}

impl HasMessages for InterviewState {
    fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Sends the latest human question to the remote A2A agent
pub struct QueryA2aNode {
    base_url: String,
    client_config: ClientConfig,
}

impl QueryA2aNode {
    pub fn new(base_url: impl Into<String>, client_config: ClientConfig) -> Self {
        Self {
            base_url: base_url.into(),
            client_config,
        }
    }

    async fn fetch_agent_card(&self) -> A2aResult<Arc<AgentCard>> {
        info!(base_url = %self.base_url, "Fetching agent card");
        let card = CardResolver::new(self.client_config.http.clone(), &self.base_url)?
            .get_agent_card()
            .await?;
        info!(agent = %card.name, "Fetched agent card");
        Ok(Arc::new(card))
    }

    async fn ask(
        &self,
        card: Arc<AgentCard>,
        query: &str,
        state: &InterviewState,
    ) -> A2aResult<ResponseSummary> {
        let client = ClientFactory::new(self.client_config.clone()).create(card)?;

        let message = Message::user(query)
            .with_context_id(state.context_id.clone())
            .with_task_id(state.task_id.clone());

        info!(query = %truncate(query, 50), "Sending query to A2A agent");
        let summary = process_response(client.send_message(message).await?).await?;
        info!(
            task_id = summary.task_id.as_deref().unwrap_or("-"),
            "Received response from A2A agent"
        );

        Ok(summary)
    }
}

#[async_trait]
impl Node<InterviewState> for QueryA2aNode {
    async fn run(&self, state: &InterviewState) -> NodeResult<InterviewUpdate> {
        let Some(query) = last_human(&state.messages) else {
            return Ok(InterviewUpdate::message(ChatMessage::ai(NO_USER_QUERY)));
        };

        let card = match &state.agent_card {
            Some(card) => card.clone(),
            None => match self.fetch_agent_card().await {
                Ok(card) => card,
                Err(e) => {
                    error!(error = %e, "Failed to fetch agent card");
                    return Ok(InterviewUpdate::message(ChatMessage::ai(format!(
                        "Error: {}",
                        e
                    ))));
                }
            },
        };

        match self.ask(card.clone(), query.content(), state).await {
            Ok(summary) => Ok(InterviewUpdate {
                messages: vec![ChatMessage::ai(summary.content)],
                agent_card: Some(card),
                ids: Some(CorrelationIds {
                    task_id: summary.task_id,
                    context_id: summary.context_id,
                }),
            }),
            Err(e) => {
                error!(error = %e, "Error querying A2A agent");
                Ok(InterviewUpdate {
                    messages: vec![ChatMessage::ai(format!("Error: {}", e))],
                    agent_card: Some(card),
                    ids: None,
                })
            }
        }
    }
}

/// Turns the agent's latest answer into interviewing advice
pub struct AdviceNode {
    model: Arc<dyn ChatModel>,
    prompt: ChatPromptTemplate,
}

impl AdviceNode {
    pub fn new(model: Arc<dyn ChatModel>) -> LlmResult<Self> {
        Ok(Self {
            model,
            prompt: career_coach_prompt()?,
        })
    }
}

fn career_coach_prompt() -> LlmResult<ChatPromptTemplate> {
    ChatPromptTemplate::from_messages([("system", CAREER_COACH_PROMPT), ("human", "{ai_content}")])
}

#[async_trait]
impl Node<InterviewState> for AdviceNode {
    async fn run(&self, state: &InterviewState) -> NodeResult<InterviewUpdate> {
        let answer = last_ai(&state.messages).ok_or("No AI message found in state")?;
        let prompt = self
            .prompt
            .format_messages([("ai_content", answer.content())])?;

        let advice = match self.model.invoke(&prompt).await {
            Ok(reply) => ChatMessage::ai(reply.content()),
            Err(e) => {
                error!(model = self.model.model_name(), error = %e, "Advice generation failed");
                ChatMessage::ai(format!("Error: {}", e))
            }
        };

        Ok(InterviewUpdate::message(advice))
    }
}

/// `query_a2a → generate_advice → END`
pub fn build_interview_graph(
    base_url: impl Into<String>,
    client_config: ClientConfig,
    advice_model: Arc<dyn ChatModel>,
) -> DemoResult<CompiledGraph<InterviewState>> {
    let graph = StateGraph::<InterviewState>::new()
        .add_node(QUERY_A2A_NODE, QueryA2aNode::new(base_url, client_config))
        .add_node(GENERATE_ADVICE_NODE, AdviceNode::new(advice_model)?)
        .set_entry_point(QUERY_A2A_NODE)
        .add_edge(QUERY_A2A_NODE, GENERATE_ADVICE_NODE)
        .add_edge(GENERATE_ADVICE_NODE, END)
        .compile()?;
    Ok(graph)
}

fn print_responses(state: &InterviewState) {
    for message in state.messages.iter().filter(|m| m.is_ai()) {
        println!(
            "\nAgent Response:\n{}...",
            truncate(message.content(), PREVIEW_CHARS)
        );
    }
}

fn print_heading(title: &str) {
    println!("{}", title);
    println!("{}", "-".repeat(40));
}

/// Run the two example conversations and, when the agent returned both ids,
/// a follow-up in the second conversation.
pub async fn run_examples(graph: &CompiledGraph<InterviewState>) -> GraphResult<InterviewState> {
    println!("{}", "=".repeat(60));
    println!("Tandem A2A Interview Demo");
    println!("{}", "=".repeat(60));

    print_heading("\n📌 Example 1: Single Query");
    println!("User: {}", FIRST_QUERY);
    let first = graph.invoke(InterviewState::new(FIRST_QUERY)).await?;
    print_responses(&first);

    print_heading("\n\n📌 Example 2: Multi-turn Conversation");
    println!("User: {}", SECOND_QUERY);
    let second = graph
        .invoke(InterviewState::new(SECOND_QUERY).with_agent_card(first.agent_card.clone()))
        .await?;
    print_responses(&second);

    let last = if second.task_id.is_some() && second.context_id.is_some() {
        print_heading("\n📌 Follow-up Query (with context)");
        println!("User: {}", FOLLOW_UP_QUERY);
        let follow_up = graph
            .invoke(
                InterviewState::new(FOLLOW_UP_QUERY)
                    .with_agent_card(second.agent_card.clone())
                    .with_correlation(second.task_id.clone(), second.context_id.clone()),
            )
            .await?;
        print_responses(&follow_up);
        follow_up
    } else {
        second
    };

    println!("\n{}", "=".repeat(60));
    println!("Demo Complete!");
    println!("{}", "=".repeat(60));

    Ok(last)
}

/// Build the advice model and graph from config, then run the examples
pub async fn run_interview_demo(config: &DemoConfig) -> DemoResult<()> {
    let model = init_chat_model(
        &config.advice_model,
        &config.model_settings().with_temperature(ADVICE_TEMPERATURE),
    )?;
    let graph = build_interview_graph(&config.a2a_url, config.a2a_client_config(), model)?;
    run_examples(&graph).await?;
    Ok(())
}
