//! Command line front end
//!
//! Every command maps onto one [`TripmateClient`] operation. Input goes
//! through the same forms a graphical front end would use, so validation
//! messages are identical.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::api::TripmateClient;
use crate::config::TripmateConfig;
use crate::error::TripmateError;
use crate::filters::{TripRequestFilter, VacancyFilter};
use crate::forms::{LoginForm, OfferForm, ProfileForm, RegisterForm, TripRequestForm, VacancyForm};
use crate::mock::MockServer;
use crate::models::{
    CatalogOption, Gender, GenderPreference, Offer, OfferId, OptionId, Page, Profile, TripRequest,
    TripRequestId, TripVacancy, User, UserId, VacancyId,
};
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "tripmate", version, about = "Find travel companions and join trips")]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "TRIPMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use the built-in in-memory backend instead of the network
    #[arg(long, global = true)]
    pub mock: bool,

    /// Keep the session in this directory
    #[arg(long, global = true, env = "TRIPMATE_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TRIPMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    Profile(ProfileCommand),
    /// List the option catalogs used in profiles and trips
    Options(OptionsCommand),
    /// Trip vacancies: trips looking for companions
    Vacancies(VacanciesCommand),
    /// Trip requests: travellers looking for a trip
    Requests(RequestsCommand),
    /// Offers to join a trip vacancy
    Offers(OffersCommand),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long, env = "TRIPMATE_PASSWORD", hide_env_values = true)]
    password: String,
    /// Repeat the password; defaults to `--password`
    #[arg(long)]
    password_confirmation: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Show your profile, or another traveller's
    Show { user_id: Option<UserId> },
    /// Change fields of your profile
    Update(ProfileArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    birth_date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_gender)]
    gender: Option<Gender>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<OptionId>>,
    #[arg(long, value_delimiter = ',')]
    interests: Option<Vec<OptionId>>,
    #[arg(long, value_delimiter = ',')]
    travel_styles: Option<Vec<OptionId>>,
}

#[derive(Args, Debug)]
pub struct OptionsCommand {
    #[command(subcommand)]
    command: OptionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum OptionsSubcommand {
    Languages,
    Interests,
    TravelStyles,
}

#[derive(Args, Debug)]
pub struct VacanciesCommand {
    #[command(subcommand)]
    command: VacanciesSubcommand,
}

#[derive(Subcommand, Debug)]
enum VacanciesSubcommand {
    /// Browse vacancies
    List(VacancyListArgs),
    Show { id: VacancyId },
    /// Vacancies you posted
    Mine,
    Create(VacancyArgs),
    Delete { id: VacancyId },
    /// Offers received for one of your vacancies
    Offers { id: VacancyId },
}

#[derive(Args, Debug)]
struct VacancyListArgs {
    #[arg(long)]
    destination: Option<String>,
    /// Earliest start date
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest end date
    #[arg(long)]
    until: Option<NaiveDate>,
    #[arg(long)]
    budget_min: Option<u32>,
    #[arg(long)]
    budget_max: Option<u32>,
    #[arg(long)]
    gender: Option<GenderPreference>,
    #[arg(long)]
    age: Option<u8>,
    #[arg(long, value_delimiter = ',')]
    languages: Vec<OptionId>,
    #[arg(long, value_delimiter = ',')]
    travel_styles: Vec<OptionId>,
    /// Only trips with free spots
    #[arg(long)]
    open: bool,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Args, Debug)]
struct VacancyArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    destination: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: NaiveDate,
    #[arg(long)]
    budget_min: u32,
    #[arg(long)]
    budget_max: u32,
    #[arg(long, default_value = "EUR")]
    currency: String,
    #[arg(long, default_value_t = 1)]
    spots: u32,
    #[arg(long, default_value = "any")]
    gender: GenderPreference,
    #[arg(long)]
    min_age: Option<u8>,
    #[arg(long)]
    max_age: Option<u8>,
    #[arg(long, value_delimiter = ',')]
    languages: Vec<OptionId>,
    #[arg(long, value_delimiter = ',')]
    interests: Vec<OptionId>,
    #[arg(long, value_delimiter = ',')]
    travel_styles: Vec<OptionId>,
}

#[derive(Args, Debug)]
pub struct RequestsCommand {
    #[command(subcommand)]
    command: RequestsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RequestsSubcommand {
    List {
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    Mine,
    Create(TripRequestArgs),
    Delete { id: TripRequestId },
}

#[derive(Args, Debug)]
struct TripRequestArgs {
    #[arg(long)]
    destination: String,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: NaiveDate,
    #[arg(long)]
    budget: u32,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, value_delimiter = ',')]
    travel_styles: Vec<OptionId>,
}

#[derive(Args, Debug)]
pub struct OffersCommand {
    #[command(subcommand)]
    command: OffersSubcommand,
}

#[derive(Subcommand, Debug)]
enum OffersSubcommand {
    /// Ask to join a vacancy
    Send {
        vacancy_id: VacancyId,
        #[arg(long)]
        message: String,
    },
    /// Offers you sent
    Mine,
    Accept { id: OfferId },
    Reject { id: OfferId },
    Withdraw { id: OfferId },
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        other => Err(format!("unknown gender '{other}'")),
    }
}

/// Prints either JSON or one human line per item
struct Printer {
    json: bool,
}

impl Printer {
    fn one<T: Serialize>(&self, value: &T, human: impl Fn(&T) -> String) -> Result<(), TripmateError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(value));
        }
        Ok(())
    }

    fn many<T: Serialize>(&self, items: &[T], human: impl Fn(&T) -> String) -> Result<(), TripmateError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
        } else if items.is_empty() {
            println!("Nothing here yet.");
        } else {
            for item in items {
                println!("{}", human(item));
            }
        }
        Ok(())
    }

    fn page<T: Serialize>(&self, page: &Page<T>, human: impl Fn(&T) -> String) -> Result<(), TripmateError> {
        if self.json {
            return self.one(page, |_| String::new());
        }
        self.many(&page.results, human)?;
        if page.has_next() {
            println!("({} total, more with --page)", page.count);
        }
        Ok(())
    }

    fn done(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }
}

fn user_line(user: &User) -> String {
    format!("{} <{}> (#{})", user.full_name(), user.email, user.id)
}

fn option_line(option: &CatalogOption) -> String {
    format!("{:>3}  {}", option.id, option.name)
}

fn vacancy_line(vacancy: &TripVacancy) -> String {
    format!(
        "#{} {} | {} | {} | {} | {}/{} spots free",
        vacancy.id,
        vacancy.title,
        vacancy.destination,
        vacancy.format_dates(),
        vacancy.format_budget(),
        vacancy.spots_available,
        vacancy.spots_total
    )
}

fn vacancy_details(vacancy: &TripVacancy) -> String {
    let mut lines = vec![vacancy_line(vacancy)];
    if !vacancy.description.is_empty() {
        lines.push(vacancy.description.clone());
    }
    let ages = match (vacancy.min_age, vacancy.max_age) {
        (None, None) => "any age".to_string(),
        (min, max) => format!(
            "ages {}-{}",
            min.map_or_else(|| "?".to_string(), |a| a.to_string()),
            max.map_or_else(|| "?".to_string(), |a| a.to_string())
        ),
    };
    lines.push(format!(
        "Status: {:?}, gender: {}, {}",
        vacancy.status,
        vacancy.preferred_gender.as_str(),
        ages
    ));
    lines.join("\n")
}

fn request_line(request: &TripRequest) -> String {
    format!(
        "#{} {} | {} - {} | up to {}",
        request.id, request.destination, request.start_date, request.end_date, request.budget_max
    )
}

fn offer_line(offer: &Offer) -> String {
    format!(
        "#{} vacancy #{} from user #{} [{:?}] {}",
        offer.id, offer.vacancy_id, offer.sender_id, offer.status, offer.message
    )
}

fn profile_details(profile: &Profile) -> String {
    let mut lines = vec![format!("{} {}", profile.first_name, profile.last_name)];
    if let Some(city) = &profile.city {
        lines.push(format!("City: {city}"));
    }
    if let Some(age) = profile.age_on(Utc::now().date_naive()) {
        lines.push(format!("Age: {age}"));
    }
    if !profile.bio.is_empty() {
        lines.push(profile.bio.clone());
    }
    lines.join("\n")
}

/// Build the client the flags ask for
pub fn build_client(cli: &Cli, config: &TripmateConfig) -> Result<TripmateClient, TripmateError> {
    let mut session_config = config.session.clone();
    if let Some(dir) = &cli.session_dir {
        session_config.backend = "persistent".to_string();
        session_config.location = dir.display().to_string();
    }
    let session = Session::from_config(&session_config)?;

    if cli.mock {
        debug!("Using in-memory backend");
        let server = MockServer::seeded(Utc::now().date_naive());
        Ok(TripmateClient::with_transport(
            Arc::new(server),
            session,
            &config.auth,
        ))
    } else {
        TripmateClient::from_config(config, session)
    }
}

/// Run one command to completion
pub async fn run(cli: Cli, config: &TripmateConfig) -> Result<(), TripmateError> {
    let client = build_client(&cli, config)?;
    let out = Printer { json: cli.json };
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Login { email, password } => {
            let credentials = LoginForm::new(email, password).validate()?;
            let user = client.login(&credentials).await?;
            out.one(&user, |u| format!("Signed in as {}", user_line(u)))
        }
        Command::Register(args) => {
            let form = RegisterForm {
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
                password_confirmation: args
                    .password_confirmation
                    .unwrap_or_else(|| args.password.clone()),
                password: args.password,
            };
            let user = client.register(&form.validate()?).await?;
            out.one(&user, |u| format!("Welcome, {}", user_line(u)))
        }
        Command::Logout => {
            client.logout().await?;
            out.done("Signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = client.current_user().await?;
            out.one(&user, user_line)
        }
        Command::Profile(profile) => run_profile(&client, &out, profile.command, today).await,
        Command::Options(options) => {
            let items = match options.command {
                OptionsSubcommand::Languages => client.languages().await?,
                OptionsSubcommand::Interests => client.interests().await?,
                OptionsSubcommand::TravelStyles => client.travel_styles().await?,
            };
            out.many(&items, option_line)
        }
        Command::Vacancies(vacancies) => {
            run_vacancies(&client, &out, vacancies.command, today).await
        }
        Command::Requests(requests) => run_requests(&client, &out, requests.command, today).await,
        Command::Offers(offers) => run_offers(&client, &out, offers.command).await,
    }
}

async fn run_profile(
    client: &TripmateClient,
    out: &Printer,
    command: ProfileSubcommand,
    today: NaiveDate,
) -> Result<(), TripmateError> {
    match command {
        ProfileSubcommand::Show { user_id: None } => {
            out.one(&client.my_profile().await?, profile_details)
        }
        ProfileSubcommand::Show { user_id: Some(id) } => {
            out.one(&client.profile(id).await?, profile_details)
        }
        ProfileSubcommand::Update(args) => {
            let mut form = ProfileForm::from_profile(&client.my_profile().await?);
            if let Some(first_name) = args.first_name {
                form.first_name = first_name;
            }
            if let Some(last_name) = args.last_name {
                form.last_name = last_name;
            }
            if let Some(bio) = args.bio {
                form.bio = bio;
            }
            if args.birth_date.is_some() {
                form.birth_date = args.birth_date;
            }
            if args.gender.is_some() {
                form.gender = args.gender;
            }
            if let Some(city) = args.city {
                form.city = city;
            }
            if let Some(languages) = args.languages {
                form.languages = languages;
            }
            if let Some(interests) = args.interests {
                form.interests = interests;
            }
            if let Some(travel_styles) = args.travel_styles {
                form.travel_styles = travel_styles;
            }
            let update = form.validate(today)?;
            let profile = client.update_my_profile(&update).await?;
            out.one(&profile, profile_details)
        }
    }
}

async fn run_vacancies(
    client: &TripmateClient,
    out: &Printer,
    command: VacanciesSubcommand,
    today: NaiveDate,
) -> Result<(), TripmateError> {
    match command {
        VacanciesSubcommand::List(args) => {
            let filter = VacancyFilter {
                destination: args.destination,
                starts_after: args.from,
                ends_before: args.until,
                budget_min: args.budget_min,
                budget_max: args.budget_max,
                gender: args.gender,
                age: args.age,
                languages: args.languages,
                travel_styles: args.travel_styles,
                only_open: args.open,
                page: args.page,
                page_size: args.page_size,
            };
            out.page(&client.list_vacancies(&filter).await?, vacancy_line)
        }
        VacanciesSubcommand::Show { id } => out.one(&client.vacancy(id).await?, vacancy_details),
        VacanciesSubcommand::Mine => out.many(&client.my_vacancies().await?, vacancy_line),
        VacanciesSubcommand::Create(args) => {
            let form = VacancyForm {
                title: args.title,
                destination: args.destination,
                description: args.description,
                start_date: Some(args.start),
                end_date: Some(args.end),
                budget_min: Some(args.budget_min),
                budget_max: Some(args.budget_max),
                currency: args.currency,
                spots_total: Some(args.spots),
                preferred_gender: args.gender,
                min_age: args.min_age,
                max_age: args.max_age,
                languages: args.languages,
                interests: args.interests,
                travel_styles: args.travel_styles,
            };
            let payload = form.validate(today)?;
            let vacancy = client.create_vacancy(&payload).await?;
            out.one(&vacancy, |v| format!("Created {}", vacancy_line(v)))
        }
        VacanciesSubcommand::Delete { id } => {
            client.delete_vacancy(id).await?;
            out.done(&format!("Deleted vacancy #{id}"));
            Ok(())
        }
        VacanciesSubcommand::Offers { id } => {
            out.many(&client.offers_for_vacancy(id).await?, offer_line)
        }
    }
}

async fn run_requests(
    client: &TripmateClient,
    out: &Printer,
    command: RequestsSubcommand,
    today: NaiveDate,
) -> Result<(), TripmateError> {
    match command {
        RequestsSubcommand::List { destination, page } => {
            let filter = TripRequestFilter { destination, page };
            out.page(&client.list_trip_requests(&filter).await?, request_line)
        }
        RequestsSubcommand::Mine => out.many(&client.my_trip_requests().await?, request_line),
        RequestsSubcommand::Create(args) => {
            let form = TripRequestForm {
                destination: args.destination,
                start_date: Some(args.start),
                end_date: Some(args.end),
                budget_max: Some(args.budget),
                description: args.description,
                travel_styles: args.travel_styles,
            };
            let request = client.create_trip_request(&form.validate(today)?).await?;
            out.one(&request, |r| format!("Created {}", request_line(r)))
        }
        RequestsSubcommand::Delete { id } => {
            client.delete_trip_request(id).await?;
            out.done(&format!("Deleted trip request #{id}"));
            Ok(())
        }
    }
}

async fn run_offers(
    client: &TripmateClient,
    out: &Printer,
    command: OffersSubcommand,
) -> Result<(), TripmateError> {
    let offer = match command {
        OffersSubcommand::Send {
            vacancy_id,
            message,
        } => {
            let vacancy = client.vacancy(vacancy_id).await?;
            let sender = client.current_user().await?;
            let payload = OfferForm::new(message).validate(&vacancy, &sender)?;
            client.submit_offer(&payload).await?
        }
        OffersSubcommand::Mine => return out.many(&client.my_offers().await?, offer_line),
        OffersSubcommand::Accept { id } => client.accept_offer(id).await?,
        OffersSubcommand::Reject { id } => client.reject_offer(id).await?,
        OffersSubcommand::Withdraw { id } => client.withdraw_offer(id).await?,
    };
    out.one(&offer, offer_line)
}
