use super::*;

/// How a statement finished. Throws travel as the `Err` arm of the crate
/// `Result`, so a full completion record is `Result<ExecFlow>`; either way
/// it is ordinary data flow, never unwinding.
#[derive(Debug, Clone)]
pub(crate) enum ExecFlow {
    Normal,
    Break(Option<String>),
    Continue(Option<String>),
    Return(Value),
}

enum LoopStep {
    Iterate,
    Exit,
}

/// What a loop does with its body's completion: absorb its own
/// break/continue (bare or naming one of the loop's labels), propagate
/// everything else.
fn loop_step(flow: ExecFlow, labels: &[String]) -> std::result::Result<LoopStep, ExecFlow> {
    match flow {
        ExecFlow::Normal | ExecFlow::Continue(None) => Ok(LoopStep::Iterate),
        ExecFlow::Continue(Some(label)) if labels.contains(&label) => Ok(LoopStep::Iterate),
        ExecFlow::Break(None) => Ok(LoopStep::Exit),
        ExecFlow::Break(Some(label)) if labels.contains(&label) => Ok(LoopStep::Exit),
        other => Err(other),
    }
}

impl Engine {
    /// Run a parsed scope body: hoist, execute, and yield the value of the
    /// last expression statement.
    pub(crate) fn run_program(
        &mut self,
        program: &Program,
        scope: &ScopeHandle,
        deletable_bindings: bool,
    ) -> Result<Value> {
        let saved = std::mem::replace(&mut self.state.completion_value, Value::Undefined);
        self.hoist_declarations(program, scope, deletable_bindings)?;
        let result = self.execute_stmts(&program.body, scope);
        let value = std::mem::replace(&mut self.state.completion_value, saved);
        result?;
        Ok(value)
    }

    /// `var` and function declarations bind at scope entry, wherever they
    /// sit in the text — including branches that never run.
    pub(crate) fn hoist_declarations(
        &mut self,
        program: &Program,
        scope: &ScopeHandle,
        deletable: bool,
    ) -> Result<()> {
        for name in &program.vars {
            self.declare_var(scope, name, deletable);
        }
        for func in &program.funcs {
            let name = match &func.name {
                Some(name) => name.clone(),
                None => continue,
            };
            let value = self.make_function_value(func, scope, false);
            self.declare_function(scope, &name, value, deletable)?;
        }
        Ok(())
    }

    pub(crate) fn execute_stmts(
        &mut self,
        stmts: &[Stmt],
        scope: &ScopeHandle,
    ) -> Result<ExecFlow> {
        for stmt in stmts {
            match self.execute_stmt(stmt, scope)? {
                ExecFlow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(ExecFlow::Normal)
    }

    pub(crate) fn execute_stmt(&mut self, stmt: &Stmt, scope: &ScopeHandle) -> Result<ExecFlow> {
        let mut labels = Vec::new();
        self.execute_labeled_stmt(stmt, scope, &mut labels)
    }

    fn execute_labeled_stmt(
        &mut self,
        stmt: &Stmt,
        scope: &ScopeHandle,
        labels: &mut Vec<String>,
    ) -> Result<ExecFlow> {
        match stmt {
            Stmt::Labeled { label, body } => {
                labels.push(label.clone());
                let flow = self.execute_labeled_stmt(body, scope, labels)?;
                Ok(match flow {
                    ExecFlow::Break(Some(broken)) if broken == *label => ExecFlow::Normal,
                    // A continue naming a non-loop label has nothing left
                    // to do once its statement finished.
                    ExecFlow::Continue(Some(continued)) if continued == *label => ExecFlow::Normal,
                    other => other,
                })
            }
            Stmt::While { cond, body } => self.execute_while(cond, body, scope, labels),
            Stmt::DoWhile { body, cond } => self.execute_do_while(body, cond, scope, labels),
            Stmt::For {
                init,
                cond,
                update,
                body,
                per_iteration_lets,
            } => self.execute_for(
                init.as_deref(),
                cond.as_ref(),
                update.as_ref(),
                body,
                per_iteration_lets,
                scope,
                labels,
            ),
            Stmt::ForIn { target, object, body } => {
                self.execute_for_in(target, object, body, scope, labels)
            }
            other => self.execute_plain_stmt(other, scope),
        }
    }

    fn execute_plain_stmt(&mut self, stmt: &Stmt, scope: &ScopeHandle) -> Result<ExecFlow> {
        match stmt {
            Stmt::Empty | Stmt::FunctionDecl { .. } => Ok(ExecFlow::Normal),
            Stmt::Expr(expr) => {
                let value = self.eval_expr(expr, scope)?;
                self.state.completion_value = value;
                Ok(ExecFlow::Normal)
            }
            Stmt::VarDecl { kind, declarations } => {
                self.execute_var_decl(*kind, declarations, scope)
            }
            Stmt::Block(body) => {
                let block_scope = self.block_scope_for(body, scope);
                self.execute_stmts(body, &block_scope)
            }
            Stmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                let test = self.eval_expr(cond, scope)?;
                if test.truthy() {
                    self.execute_stmt(then_stmt, scope)
                } else if let Some(else_stmt) = else_stmt {
                    self.execute_stmt(else_stmt, scope)
                } else {
                    Ok(ExecFlow::Normal)
                }
            }
            Stmt::Break(label) => Ok(ExecFlow::Break(label.clone())),
            Stmt::Continue(label) => Ok(ExecFlow::Continue(label.clone())),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Undefined,
                };
                Ok(ExecFlow::Return(value))
            }
            Stmt::Throw(expr) => {
                let value = self.eval_expr(expr, scope)?;
                Err(self.throw_value(value))
            }
            Stmt::Try {
                block,
                catch,
                finally,
            } => self.execute_try(block, catch.as_ref(), finally.as_deref(), scope),
            Stmt::Switch {
                discriminant,
                cases,
            } => self.execute_switch(discriminant, cases, scope),
            Stmt::With { object, body } => {
                let value = self.eval_expr(object, scope)?;
                let backing = self.to_object_value(&value)?;
                let with_scope = ScopeRecord::object_backed(backing, Some(scope.clone()), false);
                self.execute_stmt(body, &with_scope)
            }
            Stmt::Labeled { .. }
            | Stmt::While { .. }
            | Stmt::DoWhile { .. }
            | Stmt::For { .. }
            | Stmt::ForIn { .. } => unreachable!("routed through execute_labeled_stmt"),
        }
    }

    fn execute_var_decl(
        &mut self,
        kind: DeclKind,
        declarations: &[(String, Option<Expr>)],
        scope: &ScopeHandle,
    ) -> Result<ExecFlow> {
        for (name, init) in declarations {
            match kind {
                DeclKind::Var => {
                    // The binding itself was hoisted; only the initializer
                    // runs here, as an ordinary assignment.
                    if let Some(expr) = init {
                        let value = self.eval_expr(expr, scope)?;
                        self.write_binding(scope, name, value)?;
                    }
                }
                DeclKind::Let | DeclKind::Const => {
                    let value = match init {
                        Some(expr) => self.eval_expr(expr, scope)?,
                        None => Value::Undefined,
                    };
                    self.declare_block_binding(scope, name, value, kind == DeclKind::Let);
                }
            }
        }
        Ok(ExecFlow::Normal)
    }

    /// Blocks only pay for a scope when they actually declare one.
    fn block_scope_for(&mut self, body: &[Stmt], scope: &ScopeHandle) -> ScopeHandle {
        let needs_scope = body.iter().any(|stmt| {
            matches!(
                stmt,
                Stmt::VarDecl {
                    kind: DeclKind::Let | DeclKind::Const,
                    ..
                }
            )
        });
        if needs_scope {
            ScopeRecord::declarative(Some(scope.clone()), false)
        } else {
            scope.clone()
        }
    }

    fn execute_while(
        &mut self,
        cond: &Expr,
        body: &Stmt,
        scope: &ScopeHandle,
        labels: &[String],
    ) -> Result<ExecFlow> {
        loop {
            let test = self.eval_expr(cond, scope)?;
            if !test.truthy() {
                return Ok(ExecFlow::Normal);
            }
            let flow = self.execute_stmt(body, scope)?;
            match loop_step(flow, labels) {
                Ok(LoopStep::Iterate) => {}
                Ok(LoopStep::Exit) => return Ok(ExecFlow::Normal),
                Err(flow) => return Ok(flow),
            }
        }
    }

    fn execute_do_while(
        &mut self,
        body: &Stmt,
        cond: &Expr,
        scope: &ScopeHandle,
        labels: &[String],
    ) -> Result<ExecFlow> {
        loop {
            let flow = self.execute_stmt(body, scope)?;
            match loop_step(flow, labels) {
                Ok(LoopStep::Iterate) => {}
                Ok(LoopStep::Exit) => return Ok(ExecFlow::Normal),
                Err(flow) => return Ok(flow),
            }
            let test = self.eval_expr(cond, scope)?;
            if !test.truthy() {
                return Ok(ExecFlow::Normal);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn execute_for(
        &mut self,
        init: Option<&ForInit>,
        cond: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
        per_iteration_lets: &[String],
        scope: &ScopeHandle,
        labels: &[String],
    ) -> Result<ExecFlow> {
        let head_scope = if per_iteration_lets.is_empty() {
            scope.clone()
        } else {
            ScopeRecord::declarative(Some(scope.clone()), false)
        };

        match init {
            Some(ForInit::Decl(decl)) => {
                self.execute_stmt(decl, &head_scope)?;
            }
            Some(ForInit::Expr(expr)) => {
                self.eval_expr(expr, &head_scope)?;
            }
            None => {}
        }

        // Each iteration of a `for (let ...)` loop gets its own copies of
        // the head bindings, so closures capture per-iteration state.
        let mut iter_scope = self.next_iteration_scope(&head_scope, scope, per_iteration_lets);
        loop {
            if let Some(cond) = cond {
                let test = self.eval_expr(cond, &iter_scope)?;
                if !test.truthy() {
                    return Ok(ExecFlow::Normal);
                }
            }
            let flow = self.execute_stmt(body, &iter_scope)?;
            match loop_step(flow, labels) {
                Ok(LoopStep::Iterate) => {}
                Ok(LoopStep::Exit) => return Ok(ExecFlow::Normal),
                Err(flow) => return Ok(flow),
            }
            // The fresh bindings are made before the update runs, so a
            // closure taken during the body keeps this iteration's values.
            iter_scope = self.next_iteration_scope(&iter_scope, scope, per_iteration_lets);
            if let Some(update) = update {
                self.eval_expr(update, &iter_scope)?;
            }
        }
    }

    fn next_iteration_scope(
        &mut self,
        source: &ScopeHandle,
        parent: &ScopeHandle,
        per_iteration_lets: &[String],
    ) -> ScopeHandle {
        if per_iteration_lets.is_empty() {
            return source.clone();
        }
        let fresh = ScopeRecord::declarative(Some(parent.clone()), false);
        {
            let source = source.borrow();
            let mut fresh_mut = fresh.borrow_mut();
            for name in per_iteration_lets {
                if let Some(slot) = source.bindings.get(name) {
                    fresh_mut.bindings.insert(name.clone(), slot.clone());
                }
            }
        }
        fresh
    }

    fn execute_for_in(
        &mut self,
        target: &ForInTarget,
        object: &Expr,
        body: &Stmt,
        scope: &ScopeHandle,
        labels: &[String],
    ) -> Result<ExecFlow> {
        let source = self.eval_expr(object, scope)?;
        if matches!(source, Value::Undefined | Value::Null) {
            return Ok(ExecFlow::Normal);
        }
        let object = self.to_object_value(&source)?;

        if let ForInTarget::Decl {
            kind: DeclKind::Var,
            name,
        } = target
        {
            self.declare_var(scope, name, false);
        }

        let keys = self.enumeration_candidates(&object)?;
        for key in keys {
            // Deleted mid-walk: the key drops out. Keys added after the
            // walk started never join it.
            if !self.enumeration_still_live(&object, &key)? {
                continue;
            }

            let iteration_scope = match target {
                ForInTarget::Decl {
                    kind: DeclKind::Let | DeclKind::Const,
                    name,
                } => {
                    let fresh = ScopeRecord::declarative(Some(scope.clone()), false);
                    self.declare_block_binding(&fresh, name, Value::string(&key), true);
                    fresh
                }
                ForInTarget::Decl { name, .. } => {
                    self.write_binding(scope, name, Value::string(&key))?;
                    scope.clone()
                }
                ForInTarget::Expr(expr) => {
                    let slot = self.resolve_ref(expr, scope)?;
                    self.ref_set(&slot, Value::string(&key), scope)?;
                    scope.clone()
                }
            };

            let flow = self.execute_stmt(body, &iteration_scope)?;
            match loop_step(flow, labels) {
                Ok(LoopStep::Iterate) => {}
                Ok(LoopStep::Exit) => return Ok(ExecFlow::Normal),
                Err(flow) => return Ok(flow),
            }
        }
        Ok(ExecFlow::Normal)
    }

    /// The finally-overrides protocol: the `finally` block always runs, and
    /// any non-Normal completion it produces replaces whatever the
    /// try/catch half had decided — returns, breaks, and live throws alike.
    fn execute_try(
        &mut self,
        block: &[Stmt],
        catch: Option<&CatchClause>,
        finally: Option<&[Stmt]>,
        scope: &ScopeHandle,
    ) -> Result<ExecFlow> {
        let mut completion = self.execute_stmts(block, scope);

        if let Err(Error::ScriptThrown(thrown)) = &completion {
            if let Some(clause) = catch {
                let caught = thrown.value.clone();
                let catch_scope = ScopeRecord::declarative(Some(scope.clone()), false);
                self.declare_block_binding(&catch_scope, &clause.binding, caught, true);
                completion = self.execute_stmts(&clause.body, &catch_scope);
            }
        }

        if let Some(finally_stmts) = finally {
            match self.execute_stmts(finally_stmts, scope) {
                Ok(ExecFlow::Normal) => {}
                overriding => return overriding,
            }
        }
        completion
    }

    fn execute_switch(
        &mut self,
        discriminant: &Expr,
        cases: &[SwitchCase],
        scope: &ScopeHandle,
    ) -> Result<ExecFlow> {
        let subject = self.eval_expr(discriminant, scope)?;

        let mut start = None;
        for (index, case) in cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let test = self.eval_expr(test, scope)?;
                if self.strict_equals(&subject, &test) {
                    start = Some(index);
                    break;
                }
            }
        }
        let start = start.or_else(|| {
            cases
                .iter()
                .position(|case| case.test.is_none())
        });
        let Some(start) = start else {
            return Ok(ExecFlow::Normal);
        };

        // Fall through from the matching clause to the end, default and
        // later cases included, until something breaks out.
        for case in &cases[start..] {
            match self.execute_stmts(&case.body, scope)? {
                ExecFlow::Normal => {}
                ExecFlow::Break(None) => return Ok(ExecFlow::Normal),
                flow => return Ok(flow),
            }
        }
        Ok(ExecFlow::Normal)
    }
}
