use noticeboard::{
    auth::AuthService,
    config::Settings,
    domain::{
        AdminRole, BloodGroup, CreateAdminUser, Gender, MemberDraft, NoticeDraft, NoticeKind,
        TournamentDetails,
    },
    repository::{
        AdminUserRepository, SqliteAdminUserRepository,
        MemberRepository, SqliteMemberRepository,
        NoticeRepository, SqliteNoticeRepository,
    },
    validation::rules,
};
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::sqlite::SqlitePoolOptions;

/// Creates the first super-admin and, optionally, sample club data.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Database URL; defaults to the configured one
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, default_value = "admin")]
    username: String,

    #[arg(long, default_value = "admin@club.local")]
    email: String,

    /// Generated when omitted
    #[arg(long)]
    password: Option<String>,

    /// Also insert sample notices, an open tournament and members
    #[arg(long)]
    with_samples: bool,
}

fn generate_password() -> String {
    loop {
        let candidate: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        if rules::password_strength(&candidate).is_ok() {
            return candidate;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = match args.database_url {
        Some(url) => url,
        None => Settings::new().unwrap_or_default().database.url,
    };

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    // Run migrations first
    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let admin_repo = SqliteAdminUserRepository::new(db_pool.clone());
    let notice_repo = SqliteNoticeRepository::new(db_pool.clone());
    let member_repo = SqliteMemberRepository::new(db_pool.clone());

    println!("🔑 Creating super-admin...");

    let admin = match admin_repo.find_by_username(&args.username).await? {
        Some(existing) => {
            println!("  ⏭️  Admin '{}' already exists, leaving it untouched", existing.username);
            existing
        }
        None => {
            if let Some(password) = &args.password {
                if rules::password_strength(password).is_err() || password.len() < 6 {
                    anyhow::bail!(
                        "password must be at least 6 characters with a lowercase letter, an uppercase letter and a number"
                    );
                }
            }
            let generated = args.password.is_none();
            let password = args.password.unwrap_or_else(generate_password);

            let admin = admin_repo.create(CreateAdminUser {
                username: args.username.clone(),
                email: args.email.to_lowercase(),
                password_hash: AuthService::hash_password(&password)?,
                role: AdminRole::SuperAdmin,
            }).await?;

            if generated {
                println!("  ✅ Created super-admin {} / {}", admin.username, password);
            } else {
                println!("  ✅ Created super-admin {}", admin.username);
            }
            admin
        }
    };

    if !args.with_samples {
        println!("\n✨ Database seeding complete!");
        return Ok(());
    }

    println!("📰 Creating notices...");

    let now = Utc::now();

    notice_repo.create(NoticeDraft {
        title: "Dojo closed for maintenance".to_string(),
        content: "The main hall is closed this Saturday while the mats are replaced.".to_string(),
        kind: NoticeKind::Notice,
        date: now + Duration::days(3),
        location: None,
        organizer: None,
        contact_info: None,
        is_active: true,
    }, admin.id).await?;

    notice_repo.create(NoticeDraft {
        title: "Summer grading".to_string(),
        content: "Belt grading for all junior and senior students. Bring your licence book.".to_string(),
        kind: NoticeKind::Event,
        date: now + Duration::days(21),
        location: Some("Main hall".to_string()),
        organizer: Some("Club committee".to_string()),
        contact_info: Some("committee@club.local".to_string()),
        is_active: true,
    }, admin.id).await?;

    notice_repo.create(NoticeDraft {
        title: "Open kumite tournament".to_string(),
        content: "Inter-club kumite tournament, all grades welcome. Weigh-in starts at 8am.".to_string(),
        kind: NoticeKind::Tournament(TournamentDetails {
            rules: Some("WKF rules, three-minute bouts".to_string()),
            prize_structure: Some("Medals for the top three in each division".to_string()),
            registration_deadline: now + Duration::days(14),
            max_participants: 32,
            current_participants: 0,
        }),
        date: now + Duration::days(30),
        location: Some("City sports centre".to_string()),
        organizer: Some("Club committee".to_string()),
        contact_info: None,
        is_active: true,
    }, admin.id).await?;

    println!("  ✅ Created 3 notices");

    println!("👥 Creating members...");

    let samples = [
        ("Aiko Tanaka", "aiko@example.com", "01711000001", Gender::Female, BloodGroup::APositive, "Black belt"),
        ("Rahim Uddin", "rahim@example.com", "01711000002", Gender::Male, BloodGroup::OPositive, "Brown belt"),
    ];
    let date_of_birth = NaiveDate::from_ymd_opt(1995, 6, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid sample date"))?;

    for (name, email, mobile, gender, blood_group, belt) in samples {
        if member_repo.find_by_email(email).await?.is_some() {
            continue;
        }
        member_repo.create(MemberDraft {
            name: name.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            date_of_birth,
            gender,
            blood_group,
            belt: Some(belt.to_string()),
            achievements: None,
            joined_at: None,
            is_active: true,
        }).await?;
    }

    println!("  ✅ Created sample members");
    println!("\n✨ Database seeding complete!");

    Ok(())
}
