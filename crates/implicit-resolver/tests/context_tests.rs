use super::*;
use crate::rules::Rule;

struct Fixture {
    arena: TypeArena,
    rules: RuleSet,
    scope: Scope,
    statements: Vec<Statement>,
    emit: EmitState,
}

impl Fixture {
    fn new(rules: RuleSet) -> Self {
        Self {
            arena: TypeArena::new(),
            rules,
            scope: Scope::new(),
            statements: Vec::new(),
            emit: EmitState::new(),
        }
    }

    fn context(&mut self, options: DeriveOptions) -> ResolutionContext<'_> {
        ResolutionContext::new(
            &self.arena,
            &self.rules,
            options,
            &self.scope,
            &mut self.statements,
            &mut self.emit,
        )
    }
}

fn local(name: &str) -> Plan {
    Plan::Binding(Binding::Local(name.to_string()))
}

#[test]
fn test_in_scope_local_is_referenced_directly() {
    let mut fixture = Fixture::new(RuleSet::standard());
    fixture.scope.push_local(TypeId::NUMBER, "n");

    let mut context = fixture.context(DeriveOptions::default());
    let resolution = context.resolve(TypeId::NUMBER).expect("local in scope");
    assert_eq!(resolution.plan, local("n"));
    assert_eq!(context.realize(&resolution.plan), Expr::id("n"));
    drop(context);

    assert!(fixture.statements.is_empty());
}

#[test]
fn test_module_binding_goes_through_alias() {
    let mut fixture = Fixture::new(RuleSet::standard());
    fixture
        .scope
        .push_module(TypeId::STRING, Vec::new(), "./guards", "name");

    let mut context = fixture.context(DeriveOptions::default());
    let resolution = context.resolve(TypeId::STRING).expect("export in scope");
    assert_eq!(
        context.realize(&resolution.plan),
        Expr::prop(Expr::id("module"), "name")
    );
    drop(context);

    assert_eq!(fixture.emit.imports.get("./guards"), Some("module"));
}

#[test]
fn test_shared_derivation_is_emitted_once() {
    let mut fixture = Fixture::new(RuleSet::standard());
    let mut context = fixture.context(DeriveOptions::default());

    let shared = context.providing(Resolution::new(
        TypeId::NUMBER,
        Plan::call(local("make"), Vec::new()),
    ));
    let id = shared.derivation().expect("shared resolution");
    assert!(!context.cell(id).is_some_and(DerivationCell::is_emitted));

    // A later goal finds the shared cell through the resolution view.
    let again = context.resolve(TypeId::NUMBER).expect("shared cell in view");
    assert_eq!(again.derivation(), Some(id));

    let first = context.realize(&shared.plan);
    let second = context.realize(&again.plan);
    assert_eq!(first, Expr::id("derivation"));
    assert_eq!(first, second);
    assert!(context.cell(id).is_some_and(|cell| cell.used));
    assert_eq!(
        context.used_derivations().collect::<Vec<_>>(),
        vec![(TypeId::NUMBER, "derivation")]
    );
    drop(context);

    assert_eq!(
        fixture.statements,
        vec![Statement::derivation(
            "derivation",
            Expr::call(Expr::id("make"), Vec::new()),
            None
        )]
    );
}

#[test]
fn test_dependencies_are_emitted_before_dependents() {
    let mut fixture = Fixture::new(RuleSet::standard());
    let mut context = fixture.context(DeriveOptions::default());

    let inner = context.providing(Resolution::new(TypeId::NUMBER, local("seed")));
    let outer = context.providing(Resolution::new(
        TypeId::STRING,
        Plan::call(local("wrap"), vec![inner.plan.clone()]),
    ));
    let expr = context.realize(&outer.plan);
    assert_eq!(expr, Expr::id("derivation_1"));
    drop(context);

    let names: Vec<&str> = fixture.statements.iter().map(Statement::bound_name).collect();
    assert_eq!(names, vec!["derivation", "derivation_1"]);
}

#[test]
fn test_unrealized_cells_are_not_reported() {
    let mut fixture = Fixture::new(RuleSet::standard());
    let mut context = fixture.context(DeriveOptions::default());

    context.providing(Resolution::new(TypeId::NUMBER, local("unused")));
    let used = context.providing(Resolution::new(TypeId::STRING, local("used")));
    context.realize(&used.plan);

    let reported: Vec<TypeId> = context.used_derivations().map(|(ty, _)| ty).collect();
    assert_eq!(reported, vec![TypeId::STRING]);
    assert_eq!(context.cells().len(), 2);
}

#[test]
fn test_type_comments_follow_options() {
    let mut fixture = Fixture::new(RuleSet::standard());
    let options = DeriveOptions::default().with_type_comments(true);
    let mut context = fixture.context(options);

    let shared = context.providing(Resolution::new(TypeId::NUMBER, local("n")));
    context.realize(&shared.plan);
    drop(context);

    assert_eq!(
        fixture.statements,
        vec![Statement::derivation(
            "derivation",
            Expr::id("n"),
            Some("number".to_string())
        )]
    );
}

fn reenter(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    context.resolve(target)
}

#[test]
fn test_goal_in_progress_is_declined() {
    let mut fixture = Fixture::new(RuleSet::new(vec![Rule::new("reenter", reenter)]));
    let mut context = fixture.context(DeriveOptions::default());
    assert_eq!(context.resolve(TypeId::NUMBER), None);
}

fn widen(context: &mut ResolutionContext<'_>, target: TypeId) -> Option<Resolution> {
    // A fresh, never-equal goal on every step.
    let next = context.arena().structural(vec![implicit_solver::Member::new("next", target)]);
    context.resolve(next)
}

#[test]
fn test_unbounded_descent_hits_depth_limit() {
    let mut fixture = Fixture::new(RuleSet::new(vec![Rule::new("widen", widen)]));
    let mut context = fixture.context(DeriveOptions::default());
    assert_eq!(context.resolve(TypeId::NUMBER), None);
}
