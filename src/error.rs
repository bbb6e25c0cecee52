//! Crate-wide error type.
//!
//! Covers an unbound variable, an operator applied to the wrong value shape,
//! a failure to load a graph, a malformed grammar, and a syntax error (the
//! last one is raised by the parser, not by this crate, but still needs a
//! variant to carry it).

error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        UninitializedVariable(name: String) {
            description("uninitialized variable")
            display("uninitialized variable: '{}'", name)
        }

        TypeMismatch(msg: String) {
            description("type mismatch")
            display("type mismatch: {}", msg)
        }

        LoadFailure(msg: String) {
            description("load failure")
            display("load failure: {}", msg)
        }

        GrammarError(msg: String) {
            description("grammar error")
            display("grammar error: {}", msg)
        }

        SyntaxError(msg: String) {
            description("syntax error")
            display("syntax error: {}", msg)
        }
    }
}
