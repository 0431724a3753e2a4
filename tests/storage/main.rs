mod pager_test;
mod storage_manager_test;
