use clap::{Parser, Subcommand};
use colegio_cli::seeder::{self, SeedConfig};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "colegio-cli")]
#[command(about = "Colegio José Martí CLI - Administrative tools for the academic portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a validated administrator account
    CreateAdmin {
        /// Full name of the admin
        #[arg(short = 'n', long)]
        nombre: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create the default admin accounts if they are missing
    SeedAdmins,
    /// Seed the database with fake docentes, estudiantes, cursos and clases
    Seed {
        /// Number of docentes to create
        #[arg(long, default_value = "10")]
        docentes: usize,

        /// Number of estudiantes to create
        #[arg(long, default_value = "200")]
        estudiantes: usize,

        /// Number of cursos to create
        #[arg(long, default_value = "6")]
        cursos: usize,

        /// Number of clases per curso
        #[arg(long, default_value = "2")]
        clases: usize,

        /// Academic year of the seeded cursos
        #[arg(long, default_value = "2025")]
        anio: i32,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    let pool = match sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            nombre,
            email,
            password,
        } => handle_create_admin(&pool, nombre, email, password).await,
        Commands::SeedAdmins => handle_seed_admins(&pool).await,
        Commands::Seed {
            docentes,
            estudiantes,
            cursos,
            clases,
            anio,
        } => {
            let config = SeedConfig::new(docentes, estudiantes, cursos)
                .with_clases_por_curso(clases)
                .with_anio_academico(anio);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    nombre: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let nombre = nombre.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Nombre")
            .interact_text()
            .expect("Failed to read nombre")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    if password.len() < 6 {
        eprintln!("\n❌ Password must be at least 6 characters");
        std::process::exit(1);
    }

    match seeder::create_admin(pool, &nombre, &email, &password).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", email.trim().to_lowercase());
            println!("   Nombre: {}", nombre);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed_admins(pool: &sqlx::postgres::PgPool) {
    println!("🛡️  Seeding default admins...");
    match seeder::seed_default_admins(pool).await {
        Ok(created) => println!("✅ Created {} admin(s)", created),
        Err(e) => {
            eprintln!("\n❌ Error seeding admins: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
