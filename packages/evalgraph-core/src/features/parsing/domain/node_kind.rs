//! Closed node model
//!
//! One variant per syntactic construct the evaluation-order rules know about.
//! Children are arena ids; `NodeKind::children` lists them in source order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its `SyntaxTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Syntactic construct of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    // ═══════════════════════════════════════════════════════════════════
    // Declarations
    // ═══════════════════════════════════════════════════════════════════
    CompilationUnit {
        members: Vec<NodeId>,
    },
    /// Class, interface, enum, record, or anonymous class body
    ClassDeclaration {
        name: String,
        members: Vec<NodeId>,
    },
    /// Method or constructor
    MethodDeclaration {
        name: String,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    },
    /// Local or field declaration statement
    VariableDeclarations {
        declarators: Vec<NodeId>,
    },
    /// `name = initializer`; also formal, catch, lambda and for-each
    /// parameters and try resources
    VariableDeclarator {
        name: String,
        initializer: Option<NodeId>,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    WhileLoop {
        condition: NodeId,
        body: NodeId,
    },
    DoWhileLoop {
        body: NodeId,
        condition: NodeId,
    },
    ForLoop {
        init: Vec<NodeId>,
        condition: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEachLoop {
        variable: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    /// Switch statement or switch expression
    Switch {
        selector: NodeId,
        cases: Vec<NodeId>,
    },
    /// `case A, B:` statement group or `case A ->` rule
    Case {
        labels: Vec<String>,
        is_default: bool,
        arrow: bool,
        body: Vec<NodeId>,
    },
    Try {
        resources: Vec<NodeId>,
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    Catch {
        parameter: NodeId,
        body: NodeId,
    },
    Labeled {
        label: String,
        statement: NodeId,
    },
    Synchronized {
        lock: NodeId,
        body: NodeId,
    },
    Return {
        expression: Option<NodeId>,
    },
    Throw {
        expression: NodeId,
    },
    Yield {
        expression: NodeId,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Assert {
        condition: NodeId,
        detail: Option<NodeId>,
    },
    Empty,

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════
    Parentheses {
        expression: NodeId,
    },
    Binary {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    /// Prefix/postfix unary operators, including `++` and `--`
    Unary {
        operator: String,
        operand: NodeId,
        postfix: bool,
    },
    Cast {
        expression: NodeId,
    },
    InstanceOf {
        expression: NodeId,
    },
    /// Simple and compound assignment
    Assignment {
        operator: String,
        target: NodeId,
        value: NodeId,
    },
    /// Includes `this(..)` and `super(..)` constructor calls
    MethodInvocation {
        select: Option<NodeId>,
        name: String,
        arguments: Vec<NodeId>,
    },
    NewClass {
        arguments: Vec<NodeId>,
        body: Option<NodeId>,
    },
    NewArray {
        dimensions: Vec<NodeId>,
        initializer: Option<NodeId>,
    },
    ArrayInitializer {
        elements: Vec<NodeId>,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    FieldAccess {
        target: NodeId,
        name: String,
    },
    Ternary {
        condition: NodeId,
        then_value: NodeId,
        else_value: NodeId,
    },
    Lambda {
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    MethodReference,
    Identifier {
        name: String,
    },
    Literal,
    /// `this` or `super`
    This,

    /// Construct without an evaluation-order rule
    Unsupported {
        raw_kind: String,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Children in source order
    pub fn children(&self) -> Vec<NodeId> {
        use NodeKind::*;
        match self {
            CompilationUnit { members } | ClassDeclaration { members, .. } => members.clone(),
            MethodDeclaration {
                parameters, body, ..
            } => parameters.iter().copied().chain(*body).collect(),
            VariableDeclarations { declarators } => declarators.clone(),
            VariableDeclarator { initializer, .. } => initializer.iter().copied().collect(),
            Block { statements } => statements.clone(),
            ExpressionStatement { expression }
            | Throw { expression }
            | Yield { expression }
            | Parentheses { expression }
            | Cast { expression }
            | InstanceOf { expression } => vec![*expression],
            If {
                condition,
                then_branch,
                else_branch,
            } => [*condition, *then_branch]
                .into_iter()
                .chain(*else_branch)
                .collect(),
            WhileLoop { condition, body } => vec![*condition, *body],
            DoWhileLoop { body, condition } => vec![*body, *condition],
            ForLoop {
                init,
                condition,
                update,
                body,
            } => init
                .iter()
                .copied()
                .chain(*condition)
                .chain(update.iter().copied())
                .chain(std::iter::once(*body))
                .collect(),
            ForEachLoop {
                variable,
                iterable,
                body,
            } => vec![*variable, *iterable, *body],
            Switch { selector, cases } => std::iter::once(*selector)
                .chain(cases.iter().copied())
                .collect(),
            Case { body, .. } => body.clone(),
            Try {
                resources,
                body,
                catches,
                finally,
            } => resources
                .iter()
                .copied()
                .chain(std::iter::once(*body))
                .chain(catches.iter().copied())
                .chain(*finally)
                .collect(),
            Catch { parameter, body } => vec![*parameter, *body],
            Labeled { statement, .. } => vec![*statement],
            Synchronized { lock, body } => vec![*lock, *body],
            Return { expression } => expression.iter().copied().collect(),
            Assert { condition, detail } => std::iter::once(*condition).chain(*detail).collect(),
            Binary { left, right, .. } => vec![*left, *right],
            Unary { operand, .. } => vec![*operand],
            Assignment { target, value, .. } => vec![*target, *value],
            MethodInvocation {
                select, arguments, ..
            } => select.iter().copied().chain(arguments.iter().copied()).collect(),
            NewClass { arguments, body } => arguments.iter().copied().chain(*body).collect(),
            NewArray {
                dimensions,
                initializer,
            } => dimensions.iter().copied().chain(*initializer).collect(),
            ArrayInitializer { elements } => elements.clone(),
            ArrayAccess { array, index } => vec![*array, *index],
            FieldAccess { target, .. } => vec![*target],
            Ternary {
                condition,
                then_value,
                else_value,
            } => vec![*condition, *then_value, *else_value],
            Lambda { parameters, body } => {
                parameters.iter().copied().chain(std::iter::once(*body)).collect()
            }
            Unsupported { children, .. } => children.clone(),
            Break { .. } | Continue { .. } | Empty | MethodReference | Identifier { .. }
            | Literal | This => Vec::new(),
        }
    }

    /// Short kind name for diagnostics
    pub fn name(&self) -> &str {
        use NodeKind::*;
        match self {
            CompilationUnit { .. } => "CompilationUnit",
            ClassDeclaration { .. } => "ClassDeclaration",
            MethodDeclaration { .. } => "MethodDeclaration",
            VariableDeclarations { .. } => "VariableDeclarations",
            VariableDeclarator { .. } => "VariableDeclarator",
            Block { .. } => "Block",
            ExpressionStatement { .. } => "ExpressionStatement",
            If { .. } => "If",
            WhileLoop { .. } => "WhileLoop",
            DoWhileLoop { .. } => "DoWhileLoop",
            ForLoop { .. } => "ForLoop",
            ForEachLoop { .. } => "ForEachLoop",
            Switch { .. } => "Switch",
            Case { .. } => "Case",
            Try { .. } => "Try",
            Catch { .. } => "Catch",
            Labeled { .. } => "Labeled",
            Synchronized { .. } => "Synchronized",
            Return { .. } => "Return",
            Throw { .. } => "Throw",
            Yield { .. } => "Yield",
            Break { .. } => "Break",
            Continue { .. } => "Continue",
            Assert { .. } => "Assert",
            Empty => "Empty",
            Parentheses { .. } => "Parentheses",
            Binary { .. } => "Binary",
            Unary { .. } => "Unary",
            Cast { .. } => "Cast",
            InstanceOf { .. } => "InstanceOf",
            Assignment { .. } => "Assignment",
            MethodInvocation { .. } => "MethodInvocation",
            NewClass { .. } => "NewClass",
            NewArray { .. } => "NewArray",
            ArrayInitializer { .. } => "ArrayInitializer",
            ArrayAccess { .. } => "ArrayAccess",
            FieldAccess { .. } => "FieldAccess",
            Ternary { .. } => "Ternary",
            Lambda { .. } => "Lambda",
            MethodReference => "MethodReference",
            Identifier { .. } => "Identifier",
            Literal => "Literal",
            This => "This",
            Unsupported { raw_kind, .. } => raw_kind,
        }
    }

    /// Statements that transfer control instead of completing normally
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            NodeKind::Return { .. }
                | NodeKind::Throw { .. }
                | NodeKind::Yield { .. }
                | NodeKind::Break { .. }
                | NodeKind::Continue { .. }
        )
    }

    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            NodeKind::WhileLoop { .. }
                | NodeKind::DoWhileLoop { .. }
                | NodeKind::ForLoop { .. }
                | NodeKind::ForEachLoop { .. }
        )
    }

    /// Bodies that surrounding code cannot see into: jumps never cross them
    pub fn is_flow_boundary(&self) -> bool {
        matches!(
            self,
            NodeKind::CompilationUnit { .. }
                | NodeKind::ClassDeclaration { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::Lambda { .. }
        )
    }
}
