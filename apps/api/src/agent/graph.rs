//! Orchestrator: the seven-node state machine.
//!
//! ```text
//! classifier --[route_after_classification]--> tool_selector | context_analyzer | answer_generator
//! tool_selector --> information_extractor --> context_analyzer --> answer_generator --> quality_validator
//! quality_validator --[route_after_validation]--> confidence_calculator | context_analyzer | classifier
//! confidence_calculator --> END
//! ```
//!
//! Nodes run strictly one after another. A total-node-execution ceiling bounds the
//! reclassify cycle; below it the ceiling has no effect.

use tracing::{debug, info, warn};

use crate::agent::classifier::{
    classify_question, route_after_classification, ClassificationRoute,
};
use crate::agent::confidence::calculate_confidence;
use crate::agent::context::analyze_context;
use crate::agent::generator::generate_answer;
use crate::agent::state::{Node, WorkflowState};
use crate::agent::tools::{extract_information, select_tools};
use crate::agent::validator::{route_after_validation, validate_quality, ValidationRoute};
use crate::agent::{AgentError, ModelRuntime};

pub const DEFAULT_MAX_NODE_EXECUTIONS: usize = 20;

/// One edge of the graph. `to == None` is END; `label` names a conditional branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: Node,
    pub to: Option<Node>,
    pub label: Option<&'static str>,
}

impl Edge {
    const fn fixed(from: Node, to: Node) -> Self {
        Self {
            from,
            to: Some(to),
            label: None,
        }
    }
}

/// The full transition table, conditional branches included.
pub fn edges() -> Vec<Edge> {
    let mut edges = Vec::new();
    for route in ClassificationRoute::ALL {
        edges.push(Edge {
            from: Node::Classifier,
            to: Some(route.target()),
            label: Some(route.as_str()),
        });
    }
    edges.extend([
        Edge::fixed(Node::ToolSelector, Node::InformationExtractor),
        Edge::fixed(Node::InformationExtractor, Node::ContextAnalyzer),
        Edge::fixed(Node::ContextAnalyzer, Node::AnswerGenerator),
        Edge::fixed(Node::AnswerGenerator, Node::QualityValidator),
    ]);
    for route in ValidationRoute::ALL {
        edges.push(Edge {
            from: Node::QualityValidator,
            to: Some(route.target()),
            label: Some(route.as_str()),
        });
    }
    edges.push(Edge {
        from: Node::ConfidenceCalculator,
        to: None,
        label: None,
    });
    edges
}

/// Every node has an outgoing edge and END is reachable from the terminal node.
pub fn is_complete() -> bool {
    let edges = edges();
    Node::ALL
        .iter()
        .all(|node| edges.iter().any(|e| e.from == *node))
        && edges
            .iter()
            .any(|e| e.from == Node::ConfidenceCalculator && e.to.is_none())
}

/// Renders the transition table as a Mermaid flowchart.
pub fn to_mermaid() -> String {
    let mut out = String::from("graph TD;\n");
    out.push_str("\t__start__([<p>__start__</p>]):::first\n");
    for node in Node::ALL {
        out.push_str(&format!("\t{node}({node})\n"));
    }
    out.push_str("\t__end__([<p>__end__</p>]):::last\n");
    out.push_str(&format!("\t__start__ --> {};\n", Node::Classifier));
    for edge in edges() {
        let from = edge.from;
        let to = edge.to.map(|n| n.as_str()).unwrap_or("__end__");
        let line = match edge.label {
            Some(label) => format!("\t{from} -. &nbsp;{label}&nbsp; .-> {to};\n"),
            None => format!("\t{from} --> {to};\n"),
        };
        out.push_str(&line);
    }
    out.push_str("\tclassDef default fill:#f2f0ff,line-height:1.2\n");
    out.push_str("\tclassDef first fill-opacity:0\n");
    out.push_str("\tclassDef last fill:#bfb6fc\n");
    out
}

/// The successor of `current` given the state it just produced. `None` is END.
pub fn next_node(current: Node, state: &WorkflowState) -> Option<Node> {
    match current {
        Node::Classifier => {
            let route = route_after_classification(state);
            info!("Routing after classification: {}", route.as_str());
            Some(route.target())
        }
        Node::ToolSelector => Some(Node::InformationExtractor),
        Node::InformationExtractor => Some(Node::ContextAnalyzer),
        Node::ContextAnalyzer => Some(Node::AnswerGenerator),
        Node::AnswerGenerator => Some(Node::QualityValidator),
        Node::QualityValidator => {
            let route = route_after_validation(state);
            info!("Routing after validation: {}", route.as_str());
            Some(route.target())
        }
        Node::ConfidenceCalculator => None,
    }
}

/// Drives a `WorkflowState` from the classifier to END.
pub struct Orchestrator<'a> {
    runtime: &'a ModelRuntime,
    max_node_executions: usize,
}

impl<'a> Orchestrator<'a> {
    pub fn new(runtime: &'a ModelRuntime, max_node_executions: usize) -> Self {
        Self {
            runtime,
            max_node_executions,
        }
    }

    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, AgentError> {
        let mut current = Node::Classifier;

        loop {
            self.execute(current, &mut state).await?;

            let Some(next) = next_node(current, &state) else {
                break;
            };

            // Leave room for the terminal node.
            current = if next != Node::ConfidenceCalculator
                && state.executions() + 1 >= self.max_node_executions
            {
                warn!(
                    "Node execution ceiling ({}) reached after {} steps, finishing early",
                    self.max_node_executions,
                    state.executions()
                );
                Node::ConfidenceCalculator
            } else {
                next
            };
        }

        Ok(state)
    }

    async fn execute(&self, node: Node, state: &mut WorkflowState) -> Result<(), AgentError> {
        debug!("Entering node {node}");
        match node {
            Node::Classifier => classify_question(state, self.runtime).await?,
            Node::ToolSelector => select_tools(state),
            Node::InformationExtractor => extract_information(state, self.runtime).await,
            Node::ContextAnalyzer => analyze_context(state),
            Node::AnswerGenerator => generate_answer(state, self.runtime).await?,
            Node::QualityValidator => {
                validate_quality(state, self.runtime).await?;
            }
            Node::ConfidenceCalculator => calculate_confidence(state),
        }
        Ok(())
    }
}
