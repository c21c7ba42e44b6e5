pub mod task_list;
