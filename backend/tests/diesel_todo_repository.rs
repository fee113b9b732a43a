//! Diesel user and todo repositories against embedded PostgreSQL.
//!
//! Ownership filtering and conflict reporting live in SQL and table
//! constraints, so these cases run the real statements on a migrated schema.

use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use todo_backend::domain::ports::{
    TodoPersistenceError, TodoRepository, UserPersistenceError, UserRepository,
};
use todo_backend::domain::{
    Age, Email, NewTodo, NewUser, PasswordHash, Todo, TodoId, TodoStatus, TodoTitle, User,
    UserId, UserName,
};
use todo_backend::outbound::persistence::{
    DbPool, DieselTodoRepository, DieselUserRepository, PoolConfig,
};

mod support;

use support::{
    format_postgres_error, handle_cluster_setup_failure, provision_database,
    shared_cluster_handle,
};

struct TestContext {
    runtime: Runtime,
    users: DieselUserRepository,
    todos: DieselTodoRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

impl TestContext {
    fn register(&self, name: &str) -> User {
        self.runtime
            .block_on(self.users.insert(&new_user(name, &format!("{name}@example.com"))))
            .unwrap_or_else(|err| panic!("insert {name}: {err}"))
    }

    fn add_todo(&self, owner: UserId, title: &str) -> Todo {
        self.runtime
            .block_on(self.todos.insert(&new_todo(owner, title)))
            .unwrap_or_else(|err| panic!("insert {title}: {err}"))
    }

    fn stored_status(&self, id: TodoId) -> String {
        let mut client = Client::connect(self.database_url.as_str(), NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
        let row = client
            .query_one("SELECT status FROM todos WHERE id = $1", &[&id.get()])
            .unwrap_or_else(|err| panic!("select status: {}", format_postgres_error(&err)));
        row.get(0)
    }

    fn drop_table(&self, table: &str) {
        let mut client = Client::connect(self.database_url.as_str(), NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
        client
            .batch_execute(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .unwrap_or_else(|err| panic!("drop {table}: {}", format_postgres_error(&err)));
    }
}

fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: UserName::new(name).expect("valid name"),
        email: Email::new(email).expect("valid email"),
        age: Age::new(30).expect("valid age"),
        password_hash: PasswordHash::new(format!("$argon2id$v=19$m=8,t=1,p=1$c2FsdA${name}")),
    }
}

fn new_todo(owner: UserId, title: &str) -> NewTodo {
    NewTodo {
        title: TodoTitle::new(title).expect("valid title"),
        owner_id: owner,
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let database = provision_database(cluster)?;
    let database_url = database.url().to_owned();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        users: DieselUserRepository::new(pool.clone()),
        todos: DieselTodoRepository::new(pool),
        database_url,
        _database: database,
    })
}

#[fixture]
fn db() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn foreign_completion_matches_nothing_and_changes_nothing(db: Option<TestContext>) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: foreign completion case skipped");
        return;
    };
    let alice = ctx.register("alice");
    let bob = ctx.register("bob");
    let todo = ctx.add_todo(alice.id(), "water plants");
    assert_eq!(todo.status(), TodoStatus::Incomplete);

    let stolen = ctx
        .runtime
        .block_on(ctx.todos.mark_complete(todo.id(), bob.id()))
        .expect("update runs");
    assert!(stolen.is_none(), "foreign owner must not match");
    assert_eq!(ctx.stored_status(todo.id()), "incomplete");

    let missing = TodoId::new(todo.id().get() + 1000).expect("valid id");
    let absent = ctx
        .runtime
        .block_on(ctx.todos.mark_complete(missing, alice.id()))
        .expect("update runs");
    assert!(absent.is_none());

    let completed = ctx
        .runtime
        .block_on(ctx.todos.mark_complete(todo.id(), alice.id()))
        .expect("update runs")
        .expect("owner matches");
    assert_eq!(completed.status(), TodoStatus::Complete);
    assert_eq!(completed.owner_id(), alice.id());
    assert_eq!(ctx.stored_status(todo.id()), "complete");
}

#[rstest]
fn listing_is_scoped_to_the_owner(db: Option<TestContext>) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: listing_is_scoped_to_the_owner skipped");
        return;
    };
    let alice = ctx.register("alice");
    let bob = ctx.register("bob");
    let carol = ctx.register("carol");
    ctx.add_todo(alice.id(), "file taxes");
    ctx.add_todo(bob.id(), "walk dog");
    ctx.add_todo(alice.id(), "call mum");

    let titles = |owner: UserId| -> Vec<String> {
        ctx.runtime
            .block_on(ctx.todos.list_by_owner(owner))
            .expect("list runs")
            .into_iter()
            .map(|todo| {
                assert_eq!(todo.owner_id(), owner);
                todo.title().as_ref().to_owned()
            })
            .collect()
    };

    assert_eq!(titles(alice.id()), ["file taxes", "call mum"]);
    assert_eq!(titles(bob.id()), ["walk dog"]);
    assert!(titles(carol.id()).is_empty());
}

#[rstest]
fn user_lookups_round_trip_through_the_schema(db: Option<TestContext>) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: user_lookups_round_trip_through_the_schema skipped");
        return;
    };
    let dave = ctx.register("dave");
    ctx.register("erin");

    let email = Email::new("dave@example.com").expect("valid email");
    let account = ctx
        .runtime
        .block_on(ctx.users.find_by_email(&email))
        .expect("lookup runs")
        .expect("dave is stored");
    assert_eq!(account.user, dave);
    assert_eq!(account.password_hash, new_user("dave", "dave@example.com").password_hash);

    let nobody = UserName::new("nobody").expect("valid name");
    let missing = ctx
        .runtime
        .block_on(ctx.users.find_by_name(&nobody))
        .expect("lookup runs");
    assert!(missing.is_none());

    let names: Vec<String> = ctx
        .runtime
        .block_on(ctx.users.list_all())
        .expect("list runs")
        .iter()
        .map(|user| user.name().as_ref().to_owned())
        .collect();
    assert_eq!(names, ["dave", "erin"]);
}

#[rstest]
#[case::same_email("frank", "grace@example.com", UserPersistenceError::DuplicateEmail)]
#[case::same_name("grace", "frank@example.com", UserPersistenceError::DuplicateName)]
fn user_constraints_surface_as_conflicts(
    db: Option<TestContext>,
    #[case] name: &str,
    #[case] email: &str,
    #[case] expected: UserPersistenceError,
) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: user_constraints_surface_as_conflicts skipped");
        return;
    };
    ctx.register("grace");

    let error = ctx
        .runtime
        .block_on(ctx.users.insert(&new_user(name, email)))
        .expect_err("unique constraint rejects the row");
    assert_eq!(error, expected);
}

#[rstest]
fn todo_constraints_surface_as_domain_errors(db: Option<TestContext>) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: todo_constraints_surface_as_domain_errors skipped");
        return;
    };
    let heidi = ctx.register("heidi");
    let ivan = ctx.register("ivan");
    ctx.add_todo(heidi.id(), "buy milk");

    let duplicate = ctx
        .runtime
        .block_on(ctx.todos.insert(&new_todo(ivan.id(), "buy milk")))
        .expect_err("titles are unique across users");
    assert_eq!(duplicate, TodoPersistenceError::DuplicateTitle);

    let ghost = UserId::new(heidi.id().get() + 1000).expect("valid id");
    let orphan = ctx
        .runtime
        .block_on(ctx.todos.insert(&new_todo(ghost, "haunt house")))
        .expect_err("owner must exist");
    assert_eq!(orphan, TodoPersistenceError::UnknownOwner);
}

#[rstest]
fn missing_table_is_a_query_error(db: Option<TestContext>) {
    let Some(ctx) = db else {
        eprintln!("SKIP-TEST-CLUSTER: missing_table_is_a_query_error skipped");
        return;
    };
    let judy = ctx.register("judy");
    ctx.drop_table("todos");

    let error = ctx
        .runtime
        .block_on(ctx.todos.list_by_owner(judy.id()))
        .expect_err("table is gone");
    assert!(
        matches!(error, TodoPersistenceError::Query { .. }),
        "expected Query error, got: {error:?}"
    );
}
