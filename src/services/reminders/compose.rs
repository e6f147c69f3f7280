//! 提醒邮件正文

use crate::models::reminders::requests::{ReminderRequest, ReminderStudent};
use crate::utils::dates::format_es_date;
use crate::utils::validate::validate_email;

pub const DEFAULT_SENDER_NAME: &str = "Tu profesor";

/// 发件教师信息
#[derive(Debug, Clone, Copy)]
pub struct Signature<'a> {
    pub name: Option<&'a str>,
    pub product_name: &'a str,
}

impl Signature<'_> {
    fn render(&self) -> String {
        format!(
            "Saludos,\n{}\n\n---\nEste mensaje fue enviado automáticamente desde {}.",
            self.name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_SENDER_NAME),
            self.product_name
        )
    }
}

/// 格式合法的收件地址（去除首尾空白）
pub fn valid_email(student: &ReminderStudent) -> Option<&str> {
    let email = student.email.as_deref()?.trim();
    validate_email(email).ok()?;
    Some(email)
}

pub fn task_subject(task: &ReminderRequest) -> String {
    format!("Recordatorio: {} - {}", task.task_title, task.course_name)
}

/// 单个作业的提醒，所有学生共用同一正文
pub fn task_body(task: &ReminderRequest, signature: Signature<'_>) -> String {
    let due = task
        .due_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("\nFecha de entrega: {}", format_es_date(d)))
        .unwrap_or_default();

    format!(
        "Hola,\n\n\
         Este es un recordatorio de que tienes una tarea pendiente:\n\n\
         Curso: {}\n\
         Tarea: {}{}\n\n\
         Por favor, completa y entrega tu tarea lo antes posible.\n\n\
         {}",
        task.course_name,
        task.task_title,
        due,
        signature.render()
    )
}

/// 学生名下的一项待办
#[derive(Debug, Clone, PartialEq)]
pub struct PendingItem {
    pub task_title: String,
    pub course_name: String,
    pub due_date: Option<String>,
}

/// 按学生汇总后的提醒对象
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReminder {
    pub name: String,
    pub email: String,
    pub tasks: Vec<PendingItem>,
}

/// 按邮箱合并学生，保持首次出现的顺序
///
/// 返回合并结果以及所有带合法邮箱的条目数
pub fn group_by_student(tasks: &[ReminderRequest]) -> (Vec<StudentReminder>, usize) {
    let mut grouped: Vec<StudentReminder> = Vec::new();
    let mut with_email = 0;

    for task in tasks {
        for student in &task.students {
            let Some(email) = valid_email(student) else {
                continue;
            };
            with_email += 1;

            let item = PendingItem {
                task_title: task.task_title.clone(),
                course_name: task.course_name.clone(),
                due_date: task.due_date.clone().filter(|d| !d.is_empty()),
            };
            match grouped.iter_mut().find(|s| s.email == email) {
                Some(existing) => existing.tasks.push(item),
                None => grouped.push(StudentReminder {
                    name: student.name.clone(),
                    email: email.to_string(),
                    tasks: vec![item],
                }),
            }
        }
    }

    (grouped, with_email)
}

pub fn student_subject(reminder: &StudentReminder) -> String {
    match reminder.tasks.as_slice() {
        [only] => format!("Recordatorio: {}", only.task_title),
        tasks => format!("Recordatorio: Tienes {} tareas pendientes", tasks.len()),
    }
}

/// 个性化的汇总提醒
pub fn student_body(reminder: &StudentReminder, signature: Signature<'_>) -> String {
    let list = reminder
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let due = task
                .due_date
                .as_deref()
                .map(|d| format!("\n   Fecha de entrega: {}", format_es_date(d)))
                .unwrap_or_default();
            format!("{}. {} - {}{}", i + 1, task.task_title, task.course_name, due)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let count = match reminder.tasks.len() {
        1 => "una tarea pendiente".to_string(),
        n => format!("{n} tareas pendientes"),
    };

    format!(
        "Hola {},\n\n\
         Este es un recordatorio de que tienes {}:\n\n\
         {}\n\n\
         Por favor, completa y entrega tus tareas lo antes posible.\n\n\
         {}",
        reminder.name,
        count,
        list,
        signature.render()
    )
}

/// 发送结果的提示语
pub fn summary_message(sent: usize, failed: usize) -> String {
    if failed == 0 {
        format!("Recordatorios enviados exitosamente a {sent} estudiantes")
    } else {
        format!("Se enviaron {sent} recordatorios, {failed} fallaron")
    }
}
