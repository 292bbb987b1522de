use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{CompleteInput, Task, TaskInput, TaskQuery},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// Supports filtering by completion state and a `search` term matched
/// against title and description (case-insensitive). Tasks are ordered by
/// creation date in descending order.
///
/// ## Query Parameters:
/// - `completed` (optional): Filters tasks by completion state.
/// - `search` (optional): A string to search for in task titles and descriptions.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("")]
#[allow(unused_assignments)]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    // Base query selects tasks for the authenticated user; filter conditions
    // are appended dynamically.
    let mut sql = String::from(
        "SELECT id, title, description, completed, created_at, updated_at, user_id \
         FROM tasks WHERE user_id = $1",
    );
    let mut param_count = 2;

    if query_params.completed.is_some() {
        sql.push_str(&format!(" AND completed = ${}", param_count));
        param_count += 1;
    }
    if query_params.search.is_some() {
        sql.push_str(&format!(
            " AND (title ILIKE ${} OR description ILIKE ${})",
            param_count,
            param_count + 1
        ));
    }

    sql.push_str(" ORDER BY created_at DESC");

    let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(user.0.id);

    if let Some(completed) = query_params.completed {
        query_builder = query_builder.bind(completed);
    }
    if let Some(search) = &query_params.search {
        let search_pattern = format!("%{}%", search);
        query_builder = query_builder.bind(search_pattern.clone());
        query_builder = query_builder.bind(search_pattern);
    }

    let tasks = query_builder.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: The title of the task (required, 1-200 characters).
/// - `description` (optional): A description of the task (max 1000 characters).
///
/// ## Responses:
/// - `201 Created`: Returns the newly created `Task` object as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation on `TaskInput` fails.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.0.id);

    let result = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (id, title, description, completed, user_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, title, description, completed, created_at, updated_at, user_id",
    )
    .bind(task.id)
    .bind(task.title)
    .bind(task.description)
    .bind(task.completed)
    .bind(task.user_id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(result))
}

/// Retrieves a specific task by its ID.
///
/// The authenticated user must own the task; tasks owned by someone else
/// look exactly like missing tasks.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, completed, created_at, updated_at, user_id
         FROM tasks WHERE id = $1",
    )
    .bind(task_uuid)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) if task.user_id == user.0.id => Ok(HttpResponse::Ok().json(task)),
        _ => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Updates the title and description of a task the authenticated user owns.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_uuid = task_id.into_inner();

    let result = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET title = $1, description = $2, updated_at = now()
         WHERE id = $3 AND user_id = $4
         RETURNING id, title, description, completed, created_at, updated_at, user_id",
    )
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_uuid)
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found or not owned by user".into())),
    }
}

/// Marks a task complete or not complete.
#[post("/{id}/complete")]
pub async fn complete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    complete_data: web::Json<CompleteInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let result = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET completed = $1, updated_at = now()
         WHERE id = $2 AND user_id = $3
         RETURNING id, title, description, completed, created_at, updated_at, user_id",
    )
    .bind(complete_data.completed)
    .bind(task_uuid)
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match result {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found or not owned by user".into())),
    }
}

/// Deletes a task the authenticated user owns.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `404 Not Found`: If the task does not exist or is not owned by the user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task_uuid = task_id.into_inner();

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_uuid)
        .bind(user.0.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found or not owned by user".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::models::TaskInput;
    use validator::Validate;

    #[test]
    fn test_task_input_validation() {
        // Empty title
        let invalid_input_empty_title = TaskInput {
            title: "".to_string(),
            description: Some("Test Description".to_string()),
        };
        assert!(
            invalid_input_empty_title.validate().is_err(),
            "Validation should fail for empty title."
        );

        // Title too long (max 200)
        let long_title = "a".repeat(201);
        let invalid_input_long_title = TaskInput {
            title: long_title,
            description: Some("Test Description".to_string()),
        };
        assert!(
            invalid_input_long_title.validate().is_err(),
            "Validation should fail for overly long title."
        );

        let valid_input = TaskInput {
            title: "Valid Title".to_string(),
            description: None,
        };
        assert!(
            valid_input.validate().is_ok(),
            "Validation should pass for valid input."
        );
    }
}
