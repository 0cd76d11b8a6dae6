use chrono::Local;

use business::application::product::form::{FieldName, ProductFormController};
use business::domain::product::model::Product;
use business::domain::product::seed::random_product;
use business::domain::shared::dates::DateFormat;

use super::command::{Command, HELP};
use super::render;
use crate::setup::dependency_injection::DependencyContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum Screen {
    List,
    Form(ProductFormController),
}

/// Drives the list and form screens from parsed console commands.
pub struct Session {
    container: DependencyContainer,
    display_format: DateFormat,
    screen: Screen,
}

impl Session {
    pub fn new(container: DependencyContainer, display_format: DateFormat) -> Self {
        Self {
            container,
            display_format,
            screen: Screen::List,
        }
    }

    pub async fn start(&mut self) {
        self.reload().await;
        self.print_screen();
    }

    fn print_screen(&self) {
        match &self.screen {
            Screen::List => println!(
                "{}",
                render::product_list(
                    &self.container.list.state(),
                    &self.container.engine,
                    self.display_format
                )
            ),
            Screen::Form(form) => println!("{}", render::product_form(&form.view(), self.display_format)),
        }
    }

    pub fn print_toasts(&self) {
        let toasts = self.container.notifications.toasts();
        if !toasts.is_empty() {
            println!("{}", render::toasts(&toasts));
        }
    }

    async fn reload(&self) {
        if let Err(e) = self.container.list.load().await {
            println!("Could not load products: {}", e);
        }
    }

    async fn show_list(&mut self) {
        self.screen = Screen::List;
        self.reload().await;
    }

    fn form(&self) -> Option<&ProductFormController> {
        match &self.screen {
            Screen::Form(form) => Some(form),
            Screen::List => None,
        }
    }

    async fn seed(&self, count: usize) {
        let today = Local::now().date_naive();
        let products: Vec<Product> = {
            let mut rng = rand::rng();
            (0..count)
                .filter_map(|_| random_product(&mut rng, today).ok())
                .collect()
        };

        let mut created = 0;
        for product in &products {
            match self.container.repository.create(product).await {
                Ok(_) => created += 1,
                Err(e) => tracing::warn!("Seeding {} failed: {}", product.id, e),
            }
        }
        self.container
            .notifications
            .success(format!("{} of {} products seeded", created, count));
        self.reload().await;
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Help => {
                println!("{}", HELP);
                return Flow::Continue;
            }
            Command::Quit => return Flow::Quit,
            Command::Toasts => {
                if self.container.notifications.toasts().is_empty() {
                    println!("No notifications");
                }
                return Flow::Continue;
            }
            Command::Dismiss(id) => {
                self.container.notifications.close(id);
                return Flow::Continue;
            }
            Command::List | Command::Back => self.show_list().await,
            Command::Reload => self.reload().await,
            Command::Search(term) => {
                self.screen = Screen::List;
                self.container.search.input(&term).await;
            }
            Command::Page(page) => self.container.list.set_page(page),
            Command::Next => self.container.list.next_page(),
            Command::Previous => self.container.list.previous_page(),
            Command::Size(size) => self.container.list.set_page_size(size),
            Command::Delete(id) => {
                self.container.list.request_delete(&id);
                if self.container.list.pending_delete().is_none() {
                    println!("No product with id {}", id);
                }
            }
            Command::Confirm => {
                // Failures are already reported as toasts.
                let _ = self.container.list.confirm_delete().await;
            }
            Command::Cancel => self.container.list.cancel_delete(),
            Command::New => self.screen = Screen::Form(self.container.product_form()),
            Command::Edit(id) => {
                let form = self.container.product_form();
                if let Err(e) = form.load(id.clone()).await {
                    println!("Could not load product {}: {}", id, e);
                }
                self.screen = Screen::Form(form);
            }
            Command::Set(field, value) => {
                let Some(form) = self.form() else {
                    println!("Open a form first with 'new' or 'edit <id>'");
                    return Flow::Continue;
                };
                match field {
                    FieldName::Id => form.set_id(value),
                    FieldName::Name => form.set_name(value),
                    FieldName::Description => form.set_description(value),
                    FieldName::Logo => form.set_logo(value),
                    FieldName::DateRelease => form.set_release(value),
                    FieldName::DateRevision => {}
                }
                form.touch(field);
            }
            Command::Submit => {
                let Some(form) = self.form() else {
                    println!("Nothing to submit");
                    return Flow::Continue;
                };
                if let Err(e) = form.submit().await {
                    tracing::debug!("Submit failed: {}", e);
                }
                if self.container.navigator.take_request() {
                    self.show_list().await;
                }
            }
            Command::Restart => match self.form() {
                Some(form) => form.restart(),
                None => println!("Nothing to restart"),
            },
            Command::Seed(count) => {
                self.screen = Screen::List;
                self.seed(count).await;
            }
        }

        self.print_screen();
        Flow::Continue
    }
}
