use std::time::Duration;

use envbind::{AppContext, Configure, Field, Fields, LogSettings, Loader};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
struct AppConfig {
    app: AppSection,
    database: DatabaseSection,
    #[serde(skip)]
    log: LogSettings,
}

#[derive(Debug, Default, Serialize)]
struct AppSection {
    name: String,
    env: String,
    debug: bool,
}

#[derive(Debug, Default, Serialize)]
struct DatabaseSection {
    host: String,
    port: u16,
    name: String,
    user: UserSection,
    ssl_mode: String,
    pool: PoolSection,
}

#[derive(Debug, Default, Serialize)]
struct UserSection {
    name: String,
    #[serde(skip)]
    password: String,
}

#[derive(Debug, Default, Serialize)]
struct PoolSection {
    max_conns: i32,
    min_conns: i32,
    max_conn_lifetime: Duration,
    max_conn_idle_time: Duration,
    connect_timeout: Duration,
}

impl Configure for AppConfig {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.section(Field::new("app"), &mut self.app);
        fields.section(Field::new("database"), &mut self.database);
        fields.section(Field::new("log"), &mut self.log);
    }
}

impl Configure for AppSection {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.value(Field::new("name").required(), &mut self.name);
        fields.value(Field::new("env").default("dev"), &mut self.env);
        fields.value(Field::new("debug"), &mut self.debug);
    }
}

impl Configure for DatabaseSection {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.value(Field::new("host").required(), &mut self.host);
        fields.value(Field::new("port").default("5432"), &mut self.port);
        fields.value(Field::new("name").required(), &mut self.name);
        fields.section(Field::new("user"), &mut self.user);
        fields.value(Field::new("ssl_mode").name("sslmode").default("disable"), &mut self.ssl_mode);
        fields.section(Field::new("pool"), &mut self.pool);
    }
}

impl Configure for UserSection {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.value(Field::new("name").required(), &mut self.name);
        fields.value(Field::new("password"), &mut self.password);
    }
}

impl Configure for PoolSection {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.value(Field::new("max_conns").default("25"), &mut self.max_conns);
        fields.value(Field::new("min_conns").default("5"), &mut self.min_conns);
        fields.value(Field::new("max_conn_lifetime").default("5m"), &mut self.max_conn_lifetime);
        fields.value(Field::new("max_conn_idle_time").default("5m"), &mut self.max_conn_idle_time);
        fields.value(Field::new("connect_timeout").default("5s"), &mut self.connect_timeout);
    }
}

impl AppConfig {
    fn connection_string(&self) -> String {
        let db = &self.database;
        format!(
            "postgres://{}:{}@{}:{}/{}?application_name={}&sslmode={}",
            db.user.name, db.user.password, db.host, db.port, db.name, self.app.name, db.ssl_mode,
        )
    }
}

fn main() -> Result<(), envbind::Error> {
    let config = Loader::builder()
        .with_file("demos/app.env")
        .with_file("demos/app.local.env")
        .with_process_env()
        .build::<AppConfig>()?;

    config.log.init()?;

    let ctx = AppContext::builder()
        .with_config(config)
        .with_version(env!("CARGO_PKG_VERSION"), "dev")
        .build()?;

    let config = ctx.config();
    tracing::debug!(
        config = %serde_json::to_string(config).unwrap_or_default(),
        "loaded config"
    );
    tracing::info!(
        name = %config.app.name,
        mode = %config.app.env,
        debug = config.app.debug,
        version = ctx.version(),
        build = ctx.build_id(),
        "application started"
    );

    for descriptor in envbind::describe::<AppConfig>() {
        println!(
            "{:<32} {:<10} required={}",
            descriptor.key,
            descriptor.kind.to_string(),
            descriptor.required
        );
    }
    println!("connection: {}", config.connection_string());

    Ok(())
}
