use crate::api::attendance::AttendanceQuery;
use crate::api::menu::MenuItemPayload;
use crate::api::receipt::{ReceiptQuery, RevenueQuery};
use crate::api::salary::{SalaryQuery, SalaryReportQuery};
use crate::api::table::{AddItem, SetQuantity};
use crate::api::user::{CreateUser, UpdateUser};
use crate::model::attendance::AttendanceRecord;
use crate::model::menu_item::MenuItem;
use crate::model::receipt::Receipt;
use crate::model::role::Role;
use crate::model::table::{OrderLine, Table, TableStatus, TakeawayCustomer};
use crate::model::user::UserResponse;
use crate::models::{LoginReqDto, TokenPair};
use crate::service::revenue::DailyRevenue;
use crate::service::salary::SalaryReport;
use crate::service::takeaway::{CartLine, CustomerInfo, TakeawayOrder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cafe POS API",
        version = "1.0.0",
        description = r#"
## Café point-of-sale and staff management

### Key Features
- **Tables & Orders**
  - Build orders per table, confirm, check out and keep receipts
- **Menu**
  - Public menu for the web shop, admin CRUD
- **Takeaway**
  - Public order endpoint that fills takeaway slots
- **Attendance**
  - Check-in and check-out per shift
- **Salary**
  - Hours and pay per user over a date range, fixed-point arithmetic

### Security
Staff endpoints use **JWT Bearer authentication**. User, receipt and
salary-report endpoints are admin only.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::menu::public_menu,
        crate::api::takeaway::order_takeaway,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,
        crate::api::attendance::last_attendance,

        crate::api::salary::get_salary,
        crate::api::salary::salary_report,

        crate::api::user::list_users,
        crate::api::user::create_user,
        crate::api::user::update_user,
        crate::api::user::delete_user,

        crate::api::menu::list_categories,
        crate::api::menu::create_item,
        crate::api::menu::update_item,
        crate::api::menu::delete_item,

        crate::api::table::list_tables,
        crate::api::table::add_item,
        crate::api::table::set_quantity,
        crate::api::table::remove_item,
        crate::api::table::confirm,
        crate::api::table::checkout,

        crate::api::receipt::list_receipts,
        crate::api::receipt::revenue_summary
    ),
    components(
        schemas(
            LoginReqDto,
            TokenPair,
            Role,
            UserResponse,
            CreateUser,
            UpdateUser,
            AttendanceRecord,
            AttendanceQuery,
            SalaryReport,
            SalaryQuery,
            SalaryReportQuery,
            MenuItem,
            MenuItemPayload,
            Table,
            TableStatus,
            OrderLine,
            TakeawayCustomer,
            AddItem,
            SetQuantity,
            Receipt,
            ReceiptQuery,
            RevenueQuery,
            DailyRevenue,
            TakeawayOrder,
            CustomerInfo,
            CartLine
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token APIs"),
        (name = "Public", description = "Web shop APIs, no login"),
        (name = "Attendance", description = "Check-in and check-out APIs"),
        (name = "Salary", description = "Salary computation APIs"),
        (name = "User", description = "Staff account APIs"),
        (name = "Menu", description = "Menu management APIs"),
        (name = "Table", description = "Table and order APIs"),
        (name = "Receipt", description = "Receipt and revenue APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/menu"));
        assert!(doc.paths.paths.contains_key("/api/order_takeaway"));
        assert!(doc.paths.paths.contains_key("/api/v1/salary"));
    }
}
