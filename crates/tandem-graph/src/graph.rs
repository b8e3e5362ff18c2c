//! State graph builder and executor.
//!
//! A [`StateGraph`] is a set of named nodes joined by static edges or
//! conditional routers. [`StateGraph::compile`] validates the wiring and
//! returns a [`CompiledGraph`] that runs nodes from the entry point until a
//! route reaches [`END`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{GraphError, GraphResult, NodeResult};
use crate::state::GraphState;

/// Pseudo-node marking the start of the graph; an edge from it sets the entry point
pub const START: &str = "__start__";

/// Pseudo-node marking the end of the graph
pub const END: &str = "__end__";

/// Default number of node executions before a run is aborted
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A unit of work in a graph
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    /// Read the current state and return an update for it
    async fn run(&self, state: &S) -> NodeResult<S::Update>;
}

/// Adapter turning an async closure over an owned state into a [`Node`]
pub struct FnNode<F>(F);

/// Wrap `f` as a node; the state is cloned for each call
pub fn node_fn<F>(f: F) -> FnNode<F> {
    FnNode(f)
}

#[async_trait]
impl<S, F, Fut> Node<S> for FnNode<F>
where
    S: GraphState + Clone,
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = NodeResult<S::Update>> + Send + 'static,
{
    async fn run(&self, state: &S) -> NodeResult<S::Update> {
        (self.0)(state.clone()).await
    }
}

type Router<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

enum Route<S> {
    Edge(String),
    Conditional(Router<S>),
}

impl<S> Clone for Route<S> {
    fn clone(&self) -> Self {
        match self {
            Route::Edge(to) => Route::Edge(to.clone()),
            Route::Conditional(router) => Route::Conditional(Arc::clone(router)),
        }
    }
}

/// Graph builder
pub struct StateGraph<S: GraphState> {
    nodes: Vec<(String, Arc<dyn Node<S>>)>,
    routes: Vec<(String, Route<S>)>,
    entry: Option<String>,
}

impl<S: GraphState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> StateGraph<S> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            routes: Vec::new(),
            entry: None,
        }
    }

    /// Add a named node
    pub fn add_node<N>(mut self, name: impl Into<String>, node: N) -> Self
    where
        N: Node<S> + 'static,
    {
        self.nodes.push((name.into(), Arc::new(node)));
        self
    }

    /// Set the first node to run
    pub fn set_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Always continue from `from` to `to` (which may be [`END`]).
    /// An edge from [`START`] sets the entry point.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        if from == START {
            self.entry = Some(to);
        } else {
            self.routes.push((from, Route::Edge(to)));
        }
        self
    }

    /// Continue from `from` to whichever node `router` names
    pub fn add_conditional_edges<R>(mut self, from: impl Into<String>, router: R) -> Self
    where
        R: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.routes
            .push((from.into(), Route::Conditional(Arc::new(router))));
        self
    }

    /// Validate the wiring and produce an executable graph
    pub fn compile(self) -> GraphResult<CompiledGraph<S>> {
        let mut nodes: HashMap<String, Arc<dyn Node<S>>> = HashMap::new();
        for (name, node) in self.nodes {
            if name == END || name == START {
                return Err(GraphError::ReservedName { node: name });
            }
            if nodes.contains_key(&name) {
                return Err(GraphError::DuplicateNode { node: name });
            }
            nodes.insert(name, node);
        }

        let entry = self.entry.ok_or(GraphError::MissingEntryPoint)?;
        if !nodes.contains_key(&entry) {
            return Err(GraphError::UnknownNode { node: entry });
        }

        let mut routes: HashMap<String, Route<S>> = HashMap::new();
        for (from, route) in self.routes {
            if !nodes.contains_key(&from) {
                return Err(GraphError::UnknownNode { node: from });
            }
            match &route {
                Route::Edge(to) if to != END && !nodes.contains_key(to) => {
                    return Err(GraphError::UnknownNode { node: to.clone() });
                }
                _ => {}
            }
            if routes.contains_key(&from) {
                return Err(GraphError::ConflictingRoutes { node: from });
            }
            routes.insert(from, route);
        }

        if let Some(node) = nodes.keys().filter(|n| !routes.contains_key(*n)).min() {
            return Err(GraphError::MissingRoute { node: node.clone() });
        }

        debug!(nodes = nodes.len(), entry = %entry, "Compiled graph");

        Ok(CompiledGraph {
            nodes,
            routes,
            entry,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        })
    }
}

/// A validated, executable graph
pub struct CompiledGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    routes: HashMap<String, Route<S>>,
    entry: String,
    recursion_limit: usize,
}

impl<S: GraphState> std::fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut nodes: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        nodes.sort_unstable();
        f.debug_struct("CompiledGraph")
            .field("entry", &self.entry)
            .field("nodes", &nodes)
            .field("recursion_limit", &self.recursion_limit)
            .finish()
    }
}

impl<S: GraphState> CompiledGraph<S> {
    /// Override the maximum number of node executions per run
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Run the graph to completion and return the final state
    pub async fn invoke(&self, mut state: S) -> GraphResult<S> {
        let mut current = self.entry.clone();
        let mut steps = 0usize;

        while current != END {
            if steps >= self.recursion_limit {
                return Err(GraphError::RecursionLimit {
                    limit: self.recursion_limit,
                });
            }
            steps += 1;

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::UnknownNode {
                    node: current.clone(),
                })?;

            debug!(node = %current, step = steps, "Running node");

            let update = node
                .run(&state)
                .await
                .map_err(|source| GraphError::NodeFailed {
                    node: current.clone(),
                    source,
                })?;
            state.apply(update);

            current = match self.routes.get(&current) {
                Some(Route::Edge(to)) => to.clone(),
                Some(Route::Conditional(router)) => router(&state),
                None => {
                    return Err(GraphError::MissingRoute { node: current });
                }
            };
        }

        info!(steps, "Graph run finished");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        visits: Vec<String>,
        total: u32,
    }

    impl GraphState for Counter {
        type Update = (String, u32);

        fn apply(&mut self, (node, amount): Self::Update) {
            self.visits.push(node);
            self.total += amount;
        }
    }

    fn add(name: &'static str, amount: u32) -> impl Node<Counter> {
        node_fn(move |_state: Counter| async move { Ok::<_, BoxError>((name.to_string(), amount)) })
    }

    #[tokio::test]
    async fn test_linear_graph_runs_to_end() {
        let graph = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .add_node("b", add("b", 2))
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("b", END)
            .compile()
            .unwrap();

        let state = graph.invoke(Counter::default()).await.unwrap();
        assert_eq!(state.visits, vec!["a", "b"]);
        assert_eq!(state.total, 3);
    }

    #[tokio::test]
    async fn test_start_edge_sets_entry() {
        let graph = StateGraph::<Counter>::new()
            .add_node("only", add("only", 5))
            .add_edge(START, "only")
            .add_edge("only", END)
            .compile()
            .unwrap();

        assert_eq!(graph.invoke(Counter::default()).await.unwrap().total, 5);
    }

    #[tokio::test]
    async fn test_conditional_loop() {
        let graph = StateGraph::<Counter>::new()
            .add_node("inc", add("inc", 1))
            .set_entry_point("inc")
            .add_conditional_edges("inc", |s: &Counter| {
                if s.total < 3 { "inc".to_string() } else { END.to_string() }
            })
            .compile()
            .unwrap();

        let state = graph.invoke(Counter::default()).await.unwrap();
        assert_eq!(state.total, 3);
    }

    #[tokio::test]
    async fn test_recursion_limit() {
        let graph = StateGraph::<Counter>::new()
            .add_node("spin", add("spin", 1))
            .set_entry_point("spin")
            .add_edge("spin", "spin")
            .compile()
            .unwrap()
            .with_recursion_limit(4);

        let err = graph.invoke(Counter::default()).await.unwrap_err();
        assert!(matches!(err, GraphError::RecursionLimit { limit: 4 }));
    }

    #[tokio::test]
    async fn test_router_to_unknown_node() {
        let graph = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .set_entry_point("a")
            .add_conditional_edges("a", |_: &Counter| "nowhere".to_string())
            .compile()
            .unwrap();

        let err = graph.invoke(Counter::default()).await.unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { node } if node == "nowhere"));
    }

    #[tokio::test]
    async fn test_node_failure_names_node() {
        let failing = node_fn(|_state: Counter| async move {
            Err::<(String, u32), BoxError>("boom".into())
        });
        let graph = StateGraph::<Counter>::new()
            .add_node("explode", failing)
            .set_entry_point("explode")
            .add_edge("explode", END)
            .compile()
            .unwrap();

        let err = graph.invoke(Counter::default()).await.unwrap_err();
        assert!(matches!(err, GraphError::NodeFailed { node, .. } if node == "explode"));
    }

    #[test]
    fn test_compile_validation() {
        let missing_entry = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .add_edge("a", END)
            .compile();
        assert!(matches!(missing_entry, Err(GraphError::MissingEntryPoint)));

        let bad_edge = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .set_entry_point("a")
            .add_edge("a", "b")
            .compile();
        assert!(matches!(bad_edge, Err(GraphError::UnknownNode { .. })));

        let no_route = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .set_entry_point("a")
            .compile();
        assert!(matches!(no_route, Err(GraphError::MissingRoute { .. })));

        let two_routes = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .add_node("b", add("b", 1))
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("a", END)
            .add_edge("b", END)
            .compile();
        assert!(matches!(two_routes, Err(GraphError::ConflictingRoutes { .. })));

        let reserved = StateGraph::<Counter>::new()
            .add_node(END, add("end", 1))
            .set_entry_point(END)
            .compile();
        assert!(matches!(reserved, Err(GraphError::ReservedName { .. })));

        let duplicate = StateGraph::<Counter>::new()
            .add_node("a", add("a", 1))
            .add_node("a", add("a", 2))
            .set_entry_point("a")
            .add_edge("a", END)
            .compile();
        assert!(matches!(duplicate, Err(GraphError::DuplicateNode { .. })));
    }
}
